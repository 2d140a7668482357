//! Authentication State Machine
//!
//! ```text
//! Anonymous
//!   ↓ login / signup success
//! Authenticated
//!   ↓ logout, or any API call answered with 401
//! Anonymous
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthState {
    /// No token held
    Anonymous,
    /// Token and user held in memory and in storage
    Authenticated,
}

impl AuthState {
    pub fn can_transition_to(&self, target: AuthState) -> bool {
        matches!(
            (self, target),
            (AuthState::Anonymous, AuthState::Authenticated)
                | (AuthState::Authenticated, AuthState::Anonymous)
        )
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::Anonymous => "anonymous",
            AuthState::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
