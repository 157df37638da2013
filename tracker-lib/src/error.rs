use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracker_repo::transaction_repo::TransactionRepoError;
use tracker_repo::user_repo::UserRepoError;

/// Errors produced by handlers, mapped to HTTP responses. Every response body
/// is a JSON object with a single `error` field; internal failures keep their
/// detail in the logs only.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Transaction not found")]
    NotFound,
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<UserRepoError> for HandlerError {
    fn from(e: UserRepoError) -> Self {
        match e {
            // A user lookup only fails while verifying credentials, so the
            // missing row is reported the same way as a bad password.
            UserRepoError::UserNotFound(_) => HandlerError::InvalidCredentials,
            UserRepoError::UserAlreadyExists(_) => {
                HandlerError::Conflict("Username already exists".to_owned())
            }
            UserRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<TransactionRepoError> for HandlerError {
    fn from(e: TransactionRepoError) -> Self {
        match e {
            TransactionRepoError::TransactionNotFound(_) => HandlerError::NotFound,
            TransactionRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<argon2::Error> for HandlerError {
    fn from(e: argon2::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e).context("Unable to hash password"))
    }
}

impl From<jsonwebtoken::errors::Error> for HandlerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e).context("Unable to sign token"))
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) => StatusCode::BAD_REQUEST,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            HandlerError::InvalidToken => StatusCode::FORBIDDEN,
            HandlerError::NotFound => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if let HandlerError::Internal(e) = self {
            tracing::error!(error = ?e, "handler failed");
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
