mod config;

use anyhow::Context;
use api::App;
use core::pin::pin;
use db::{Database, NoTls};
use http_body_util::BodyExt;
use hyper::{body::Incoming, server::conn::http1, service::service_fn, Request};
use hyper_util::rt::TokioIo;
use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let config = config::Config::from_env()?;

    let runtime = Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: config::Config) -> anyhow::Result<()> {
    // Connect to the database
    let (client, conn) = config.database.connect(NoTls).await.context("cannot connect to database")?;
    let conn = tokio::spawn(async move {
        if let Err(err) = conn.await {
            log::error!("database connection closed: {err}");
        }
    });
    let app = Arc::new(App::new(Database::from(client)));

    let addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, config.port).into();
    let listener = TcpListener::bind(addr).await.with_context(|| format!("cannot bind to {addr}"))?;
    log::info!("listening on {addr}");

    let mut shutdown = pin!(tokio::signal::ctrl_c());
    loop {
        let (stream, peer) = tokio::select! {
            biased;
            res = &mut shutdown => {
                res.context("cannot listen for shutdown signal")?;
                break;
            }
            res = listener.accept() => match res {
                Ok(pair) => pair,
                Err(err) => {
                    log::warn!("failed to accept connection: {err}");
                    continue;
                }
            },
        };

        let app = app.clone();
        let service = service_fn(move |req: Request<Incoming>| {
            let app = app.clone();
            async move {
                let (parts, body) = req.into_parts();
                let body = body.collect().await?.to_bytes();
                let res = app.respond(&parts.method, &parts.uri, body).await;
                log::info!("{} {} -> {}", parts.method, parts.uri, res.status());
                Ok::<_, hyper::Error>(res)
            }
        });

        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                log::warn!("connection with {peer} failed: {err}");
            }
        });
    }

    log::info!("shutting down");
    drop(app);
    conn.abort();
    Ok(())
}
