//! Durable token store
//!
//! Holds the two entries that make up a persisted session: the opaque bearer
//! token and the JSON-serialized user profile. The store does not interpret
//! either value; validating the user payload is the session layer's job.

use crate::database::{get_value, remove_value, set_value, Database};
use crate::Result;

pub const TOKEN_KEY: &str = "geosense_token";
pub const USER_KEY: &str = "geosense_user";

/// Raw entries as found in storage. Either may be missing when the store was
/// left half-written by an older client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user_json: Option<String>,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.user_json.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.user_json.is_some()
    }
}

#[derive(Clone)]
pub struct TokenStore {
    db: Database,
}

impl TokenStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn load(&self) -> Result<StoredSession> {
        self.db.with_connection(|conn| {
            Ok(StoredSession {
                token: get_value(conn, TOKEN_KEY)?,
                user_json: get_value(conn, USER_KEY)?,
            })
        })
    }

    /// Persist token and user together; a failure leaves the previous entries untouched.
    pub fn save(&self, token: &str, user_json: &str) -> Result<()> {
        self.db.transaction(|conn| {
            set_value(conn, TOKEN_KEY, token)?;
            set_value(conn, USER_KEY, user_json)?;
            Ok(())
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.db.transaction(|conn| {
            remove_value(conn, TOKEN_KEY)?;
            remove_value(conn, USER_KEY)?;
            Ok(())
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
