//! GeoSense Storage Layer
//!
//! SQLite-backed durable client state. This is the browser-local storage of
//! the web client: a small key-value table holding the session token and the
//! serialized user profile.

mod database;
mod error;
mod migrations;
mod token_store;

pub use database::Database;
pub use error::StorageError;
pub use token_store::{StoredSession, TokenStore, TOKEN_KEY, USER_KEY};

pub type Result<T> = std::result::Result<T, StorageError>;
