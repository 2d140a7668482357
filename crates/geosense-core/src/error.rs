//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] geosense_storage::StorageError),

    #[error("{0}")]
    Auth(#[from] geosense_session::AuthError),

    #[error("{0}")]
    Normalization(#[from] geosense_routing::NormalizationError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),
}

const INTERNAL_FAILURE: &str = "Something went wrong, please try again";

impl CoreError {
    /// Route the view should navigate to, if the error demands one.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            CoreError::Api(e) => e.redirect(),
            _ => None,
        }
    }

    /// Text to show the user. Local persistence faults are reported
    /// generically; everything else carries its own message.
    pub fn user_message(&self) -> String {
        if self.is_user_facing() {
            self.to_string()
        } else {
            INTERNAL_FAILURE.to_string()
        }
    }

    fn is_user_facing(&self) -> bool {
        match self {
            CoreError::Auth(e) => e.is_user_facing(),
            CoreError::Storage(_) => false,
            _ => true,
        }
    }
}

/// Failure of a call made through [`crate::ApiClient`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the token; the session has already been cleared
    #[error("Session expired, please sign in again")]
    Unauthorized { redirect_to: String },

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn redirect(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { redirect_to } => Some(redirect_to.as_str()),
            _ => None,
        }
    }
}
