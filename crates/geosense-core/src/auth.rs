//! HTTP implementation of the auth collaborator
//!
//! Login and signup bypass [`crate::ApiClient`]: a 401 here means wrong
//! credentials, not an expired session, so it must not force a sign-out.

use async_trait::async_trait;
use serde::Serialize;

use geosense_session::{
    AuthAction, AuthApi, AuthError, AuthResponse, LoginRequest, SignupRequest,
};

use crate::client::error_message;

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        action: AuthAction,
        body: &B,
    ) -> geosense_session::Result<AuthResponse> {
        let url = format!("{}{}", self.base_url, action.path());

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            tracing::debug!(action = ?action, status = %status, "Auth request rejected");
            return Err(action.failure(message));
        }

        match response.json::<AuthResponse>().await {
            Ok(auth) => Ok(auth),
            Err(e) if e.is_decode() => {
                tracing::warn!(action = ?action, error = %e, "Malformed auth response");
                Err(action.failure(None))
            }
            Err(e) => Err(AuthError::NetworkUnavailable(e.to_string())),
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> geosense_session::Result<AuthResponse> {
        self.post(AuthAction::Login, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> geosense_session::Result<AuthResponse> {
        self.post(AuthAction::Signup, request).await
    }
}
