//! Auth API collaborator
//!
//! The session manager never talks HTTP itself. It is handed an `AuthApi`
//! implementation at construction; the production one lives in
//! `geosense-core` and tests substitute their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::session::User;
use crate::Result;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Success body of both `/api/auth/login` and `/api/auth/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Which flow a request belongs to; decides the failure variant and its
/// fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
}

impl AuthAction {
    pub fn path(&self) -> &'static str {
        match self {
            AuthAction::Login => "/api/auth/login",
            AuthAction::Signup => "/api/auth/signup",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            AuthAction::Login => "Login failed",
            AuthAction::Signup => "Signup failed",
        }
    }

    /// Build the rejection error, falling back to the generic message when
    /// the backend gave none.
    pub fn failure(&self, message: Option<String>) -> AuthError {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_message().to_string());

        match self {
            AuthAction::Login => AuthError::LoginFailed(message),
            AuthAction::Signup => AuthError::SignupFailed(message),
        }
    }
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse>;
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

impl SignupRequest {
    pub fn new(email: &str, password: &str, name: &str) -> Result<Self> {
        let email = email.trim();
        let name = name.trim();

        if !email.contains('@') {
            return Err(AuthError::InvalidInput(
                "A valid email address is required".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }
        if name.is_empty() {
            return Err(AuthError::InvalidInput("Name is required".to_string()));
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        match AuthAction::Login.failure(None) {
            AuthError::LoginFailed(msg) => assert_eq!(msg, "Login failed"),
            other => panic!("unexpected {:?}", other),
        }
        match AuthAction::Signup.failure(Some("Email taken".to_string())) {
            AuthError::SignupFailed(msg) => assert_eq!(msg, "Email taken"),
            other => panic!("unexpected {:?}", other),
        }
        match AuthAction::Signup.failure(Some("   ".to_string())) {
            AuthError::SignupFailed(msg) => assert_eq!(msg, "Signup failed"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_login_request_validation() {
        assert!(LoginRequest::new("", "secret").is_err());
        assert!(LoginRequest::new("a@b.c", "").is_err());

        let req = LoginRequest::new("  a@b.c ", "secret").unwrap();
        assert_eq!(req.email, "a@b.c");
    }

    #[test]
    fn test_signup_request_validation() {
        assert!(matches!(
            SignupRequest::new("not-an-email", "secret1", "Ana"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            SignupRequest::new("a@b.c", "12345", "Ana"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            SignupRequest::new("a@b.c", "123456", "   "),
            Err(AuthError::InvalidInput(_))
        ));

        let req = SignupRequest::new("a@b.c", "123456", " Ana ").unwrap();
        assert_eq!(req.name, "Ana");
    }

    #[test]
    fn test_request_bodies() {
        let body = serde_json::to_value(SignupRequest::new("a@b.c", "123456", "Ana").unwrap())
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "a@b.c", "password": "123456", "name": "Ana"})
        );
    }
}
