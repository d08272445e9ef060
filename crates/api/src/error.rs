use core::fmt::{self, Display};
use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{HeaderValue, CONTENT_TYPE},
    Response, StatusCode,
};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The request body could not be understood at all.
    BadRequest,
    /// The quiz (or route) does not exist.
    NotFound,
    MethodNotAllowed,
    /// The storage layer failed for reasons other than absence.
    Fatal,
}

impl Error {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Fatal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable discriminator sent alongside the message.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Fatal => "internal",
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let body = serde_json::json!({ "error": self.kind(), "message": self.to_string() }).to_string();
        let mut res = Response::new(Full::new(Bytes::from(body)));
        *res.status_mut() = self.status();
        assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json")).is_none());
        res
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BadRequest => "The request body is not a valid submission.",
            Self::NotFound => "Quiz not found.",
            Self::MethodNotAllowed => "Method not allowed on this endpoint.",
            Self::Fatal => "Oops! We have encountered an unrecoverable error on our end.",
        })
    }
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        match err {
            db::error::Error::NotFound => Self::NotFound,
            db::error::Error::BadInput | db::error::Error::Fatal => Self::Fatal,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;
    use hyper::StatusCode;

    #[test]
    fn storage_errors_map_to_http_errors() {
        assert_eq!(Error::from(db::error::Error::NotFound), Error::NotFound);
        assert_eq!(Error::from(db::error::Error::BadInput), Error::Fatal);
        assert_eq!(Error::from(db::error::Error::Fatal), Error::Fatal);
    }

    #[test]
    fn status_and_kind() {
        let cases = [
            (Error::BadRequest, StatusCode::BAD_REQUEST, "bad_request"),
            (Error::NotFound, StatusCode::NOT_FOUND, "not_found"),
            (Error::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            (Error::Fatal, StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        ];
        for (err, status, kind) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.kind(), kind);
            let res = err.into_response();
            assert_eq!(res.status(), status);
            assert_eq!(res.headers()["content-type"], "application/json");
        }
    }
}
