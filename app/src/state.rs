//! Application state management
use geosense_core::{Config, Database, GeoSense, Result};

/// Owns the single `GeoSense` container every command works against
pub struct AppState {
    geosense: GeoSense,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            geosense: GeoSense::new(config)?,
        })
    }

    pub fn with_database(config: Config, db: Database) -> Result<Self> {
        Ok(Self {
            geosense: GeoSense::with_database(config, db)?,
        })
    }

    pub fn geosense(&self) -> &GeoSense {
        &self.geosense
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    let config = Config::new(std::path::PathBuf::from("/unused"));
    AppState::with_database(config, Database::open_in_memory().unwrap()).unwrap()
}
