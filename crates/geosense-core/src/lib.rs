//! GeoSense Core
//!
//! Composition layer: configuration, the HTTP client every backend call goes
//! through, and the `GeoSense` container that views hold on to.

mod auth;
mod client;
mod config;
mod error;
mod geosense;

#[cfg(test)]
mod test_backend;

pub use auth::HttpAuthApi;
pub use client::{ApiClient, SIGN_IN_ROUTE};
pub use config::Config;
pub use error::{ApiError, CoreError};
pub use geosense::GeoSense;

// Re-export core components
pub use geosense_routing::{
    geocode, normalize, GeoPoint, Metric, NormalizationError, RouteComparison, RouteKind,
    RouteOption, DEFAULT_LOCATION, NOT_AVAILABLE,
};
pub use geosense_session::{AuthError, AuthState, Session, SessionManager, User};
pub use geosense_storage::{Database, StorageError, TokenStore};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
