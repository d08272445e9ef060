use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested row does not exist.
    NotFound,
    /// A value was rejected by a table constraint or cannot be represented by the schema.
    BadInput,
    /// Unrecoverable error (connectivity, malformed rows, ...).
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "row not found",
            Self::BadInput => "value rejected by the schema",
            Self::Fatal => "unrecoverable database error",
        })
    }
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        log::error!("database failure: {err}");
        match err.code() {
            Some(code) if *code == tokio_postgres::error::SqlState::CHECK_VIOLATION => Self::BadInput,
            _ => Self::Fatal,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
