//! Command layer
//!
//! Every command returns a [`CommandResult`] so the front end renders one
//! envelope shape regardless of which layer failed.

pub mod auth;
pub mod routes;

use geosense_core::{CoreError, SIGN_IN_ROUTE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// View to navigate to, set when the session is gone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            redirect_to: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            redirect_to: None,
        }
    }

    pub fn from_error(error: &CoreError) -> Self {
        let message = error.user_message();
        if message != error.to_string() {
            tracing::error!(error = %error, "Command failed");
        }

        let mut result = Self::err(message);
        result.redirect_to = error.redirect().map(str::to_string);
        result
    }

    /// Failure for a command that needs a signed-in user.
    pub fn sign_in_required() -> Self {
        let mut result = Self::err("Please sign in to continue".to_string());
        result.redirect_to = Some(SIGN_IN_ROUTE.to_string());
        result
    }
}

impl<T> From<geosense_core::Result<T>> for CommandResult<T> {
    fn from(result: geosense_core::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from_error(&e),
        }
    }
}
