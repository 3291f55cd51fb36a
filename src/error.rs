use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use thiserror::Error;

use crate::gatekeeper::{GatekeeperError, Rejection};

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Bad Request")]
    MissingField,

    #[error("too many email addresses submitted, try again later")]
    TooManyFromIp,

    #[error("email address already registered")]
    DuplicateEmail,

    /// The message is for logs only, never sent to the client
    #[error("Internal Server Error: {0}")]
    InternalError(String),
}

impl From<Rejection> for RestError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::MissingField => Self::MissingField,
            Rejection::TooManyFromIp => Self::TooManyFromIp,
            Rejection::DuplicateEmail => Self::DuplicateEmail,
        }
    }
}

impl From<GatekeeperError> for RestError {
    fn from(e: GatekeeperError) -> Self {
        tracing::error!("Failed to evaluate submission: {:?}", anyhow::Error::from(e));
        Self::InternalError("Database error".into())
    }
}

impl From<std::io::Error> for RestError {
    fn from(e: std::io::Error) -> Self {
        tracing::error!("Failed to read landing page: {}", e);
        Self::InternalError("Landing page".into())
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField | Self::DuplicateEmail => StatusCode::BAD_REQUEST,
            Self::TooManyFromIp => StatusCode::FORBIDDEN,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Internal details are logged where the error is built, never rendered
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            Self::InternalError(_) => status.canonical_reason().unwrap_or_default().to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(status).body(body)
    }
}
