//! Application state container
//!
//! Constructed once at startup and handed to every view. Owns the database,
//! the session manager and the API client; nothing else writes the session.

use serde_json::Value;
use std::sync::Arc;

use geosense_routing::{normalize, RouteComparison};
use geosense_session::{AuthState, SessionManager, User};
use geosense_storage::{Database, TokenStore};

use crate::auth::HttpAuthApi;
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct GeoSense {
    config: Config,
    db: Database,
    session_manager: SessionManager,
    api: ApiClient,
}

impl GeoSense {
    pub fn new(mut config: Config) -> Result<Self> {
        config.validate()?;
        let db = Database::open(&config.database_path)?;
        Self::with_database(config, db)
    }

    /// Build on an already opened database, restoring any stored session.
    pub fn with_database(config: Config, db: Database) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        let auth_api = Arc::new(HttpAuthApi::new(http.clone(), config.api_base_url.clone()));
        let session_manager = SessionManager::new(TokenStore::new(db.clone()), auth_api);
        let state = session_manager.initialize()?;

        let api = ApiClient::new(http, config.api_base_url.clone(), session_manager.clone());

        tracing::info!(
            api_base_url = %config.api_base_url,
            state = %state,
            "GeoSense client initialized"
        );

        Ok(Self {
            config,
            db,
            session_manager,
            api,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        Ok(self.session_manager.login(email, password).await?)
    }

    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<()> {
        Ok(self.session_manager.signup(email, password, name).await?)
    }

    pub fn logout(&self) {
        self.session_manager.logout();
    }

    pub fn auth_state(&self) -> AuthState {
        self.session_manager.state()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session_manager.user()
    }

    /// Fetch and normalize a three-way route comparison.
    pub async fn compare_routes(&self, origin: &str, destination: &str) -> Result<RouteComparison> {
        let raw = self.api.compare_routes(origin, destination).await?;
        let comparison = normalize(&raw)?;

        tracing::info!(
            origin = %origin,
            destination = %destination,
            available = comparison.available().count(),
            "Compared routes"
        );

        Ok(comparison)
    }

    pub async fn health_check(&self) -> Result<Value> {
        Ok(self.api.health_check().await?)
    }
}
