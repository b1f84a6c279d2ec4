use axum::http::StatusCode;
use thiserror::Error;

/// Outcomes of signup/signin the caller is expected to handle, plus
/// storage failures, which pass through unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already in use")]
    EmailInUse,
    #[error("user not found")]
    UserNotFound,
    #[error("email or password incorrect")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::EmailInUse | AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
