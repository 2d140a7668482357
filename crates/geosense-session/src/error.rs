//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    LoginFailed(String),

    #[error("{0}")]
    SignupFailed(String),

    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("An authentication request is already in progress")]
    RequestInFlight,

    #[error("Storage error: {0}")]
    Storage(#[from] geosense_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether the error should be shown next to the form that triggered it.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, AuthError::Storage(_) | AuthError::Json(_))
    }
}
