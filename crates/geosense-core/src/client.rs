//! Backend API client
//!
//! Every application call to the backend goes through [`ApiClient::call`].
//! It attaches the session's auth header and is the one place that reacts to
//! a 401: the session is expired and the caller is told to redirect to the
//! sign-in view.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use geosense_session::SessionManager;

use crate::error::ApiError;

pub const SIGN_IN_ROUTE: &str = "/signin";

const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `error` field of a JSON error body, if the body has one.
pub(crate) async fn error_message(response: reqwest::Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionManager,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, session: SessionManager) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Compare fastest, eco-friendly and cheapest routes. The raw payload is
    /// returned; normalizing it is the caller's step.
    pub async fn compare_routes(&self, origin: &str, destination: &str) -> ApiResult<Value> {
        self.call(
            Method::POST,
            "/api/routing/compare",
            &[],
            Some(json!({"origin": origin, "destination": destination})),
        )
        .await
    }

    pub async fn fastest_route(&self, origin: &str, destination: &str) -> ApiResult<Value> {
        self.single_route("/api/routing/fastest", origin, destination)
            .await
    }

    pub async fn cheapest_route(&self, origin: &str, destination: &str) -> ApiResult<Value> {
        self.single_route("/api/routing/cheapest", origin, destination)
            .await
    }

    pub async fn eco_route(&self, origin: &str, destination: &str) -> ApiResult<Value> {
        self.single_route("/api/routing/eco-friendly", origin, destination)
            .await
    }

    pub async fn traffic_insights(&self, lat: f64, lon: f64) -> ApiResult<Value> {
        self.call(
            Method::GET,
            "/api/insights/traffic",
            &coordinates(lat, lon),
            None,
        )
        .await
    }

    pub async fn busiest_hours(&self, lat: f64, lon: f64) -> ApiResult<Value> {
        self.call(
            Method::GET,
            "/api/insights/busiest-hours",
            &coordinates(lat, lon),
            None,
        )
        .await
    }

    pub async fn list_reports(&self) -> ApiResult<Value> {
        self.call(Method::GET, "/api/reports/list", &[], None).await
    }

    pub async fn health_check(&self) -> ApiResult<Value> {
        self.call(Method::GET, "/api/health", &[], None).await
    }

    async fn single_route(&self, path: &str, origin: &str, destination: &str) -> ApiResult<Value> {
        self.call(
            Method::POST,
            path,
            &[],
            Some(json!({"origin": origin, "destination": destination})),
        )
        .await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        for (name, value) in self.session.auth_header() {
            request = request.header(name.as_str(), value.as_str());
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %method, path = %path, request_id = %request_id, error = %e, "API request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(method = %method, path = %path, request_id = %request_id, "Backend returned 401, signing out");
            self.session.expire();
            return Err(ApiError::Unauthorized {
                redirect_to: SIGN_IN_ROUTE.to_string(),
            });
        }

        if !status.is_success() {
            let message = error_message(response)
                .await
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            tracing::warn!(method = %method, path = %path, status = %status, error = %message, "API error");
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Undecodable API response");
            ApiError::Decode(e.to_string())
        })
    }
}

fn coordinates(lat: f64, lon: f64) -> [(&'static str, String); 2] {
    [("lat", lat.to_string()), ("lon", lon.to_string())]
}
