pub mod error;
pub mod grade;
pub mod store;

use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{HeaderValue, CONTENT_TYPE},
    Method, Response, StatusCode, Uri,
};
use model::{Category, QuizDetail, QuizId, Submission};
use serde::Serialize;
use store::{AttemptStore, QuestionStore, QuizCatalog};

enum Route {
    /// `POST /api/quiz/submit`
    Submit,
    /// `GET /api/quizzes`
    Quizzes,
    /// `GET /api/quizzes/{id}`
    Quiz(QuizId),
}

impl Route {
    fn parse(path: &str) -> Option<Self> {
        if path == "/api/quiz/submit" {
            return Some(Self::Submit);
        }

        let rest = path.strip_prefix("/api/quizzes")?;
        if rest.is_empty() {
            return Some(Self::Quizzes);
        }

        match rest.strip_prefix('/')? {
            "" => Some(Self::Quizzes),
            id => id.parse().ok().map(Self::Quiz),
        }
    }

    fn method(&self) -> Method {
        match self {
            Self::Submit => Method::POST,
            Self::Quizzes | Self::Quiz(_) => Method::GET,
        }
    }
}

/// Extracts the `category` filter from a query string.
fn parse_category(query: &str) -> error::Result<Option<Category>> {
    for chunk in query.split('&') {
        let Some((key, value)) = chunk.split_once('=') else {
            continue;
        };
        if key == "category" {
            return value.parse().map(Some).map_err(|_| error::Error::BadRequest);
        }
    }
    Ok(None)
}

fn json<T: Serialize>(value: &T) -> error::Result<Response<Full<Bytes>>> {
    let bytes = serde_json::to_vec(value).map_err(|_| error::Error::Fatal)?;
    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    *res.status_mut() = StatusCode::OK;
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json")).is_none());
    Ok(res)
}

/// JSON front of the quiz feature.
pub struct App<S> {
    store: S,
}

impl<S> App<S>
where
    S: QuestionStore + AttemptStore + QuizCatalog,
{
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Every failure is rendered as a JSON error body with the matching status code.
    pub async fn respond(&self, method: &Method, uri: &Uri, body: Bytes) -> Response<Full<Bytes>> {
        let err = match self.try_respond(method, uri, body).await {
            Ok(res) => return res,
            Err(err) => err,
        };

        if err == error::Error::Fatal {
            log::error!("{method} {uri} failed");
        } else {
            log::debug!("{method} {uri} rejected: {}", err.kind());
        }
        err.into_response()
    }

    async fn try_respond(&self, method: &Method, uri: &Uri, body: Bytes) -> error::Result<Response<Full<Bytes>>> {
        let route = Route::parse(uri.path()).ok_or(error::Error::NotFound)?;
        if *method != route.method() {
            return Err(error::Error::MethodNotAllowed);
        }

        match route {
            Route::Submit => {
                let Submission { quiz_id, answers, session } =
                    serde_json::from_slice(&body).map_err(|_| error::Error::BadRequest)?;
                drop(body);
                let result = grade::grade_submission(&self.store, quiz_id, &answers, session).await?;
                json(&result)
            }
            Route::Quizzes => {
                let category = uri.query().map(parse_category).transpose()?.flatten();
                let quizzes = self.store.published_quizzes(category).await?;
                json(&quizzes)
            }
            Route::Quiz(id) => {
                let quiz = self.store.quiz(id).await?;
                let questions = self.store.public_questions(id).await?;
                json(&QuizDetail { quiz, questions })
            }
        }
    }
}
