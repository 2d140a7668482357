//! Session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Profile returned by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend id; numeric ids are kept in their decimal form
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    pub name: String,
}

/// The authenticated identity held by the running client.
///
/// Token and user live in the same value, so one can never be present
/// without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
    /// When this process obtained or restored the session
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user: User) -> Self {
        Self {
            token,
            user,
            authenticated_at: Utc::now(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Uint(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_numeric_id() {
        let user: User =
            serde_json::from_str(r#"{"id": 42, "email": "a@b.c", "name": "Ana"}"#).unwrap();
        assert_eq!(user.id, "42");
    }

    #[test]
    fn test_user_string_id_and_extra_fields() {
        let user: User = serde_json::from_str(
            r#"{"id": "u-1", "email": "a@b.c", "name": "Ana", "created_at": "2025-01-01"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn test_user_missing_field_is_rejected() {
        let parsed = serde_json::from_str::<User>(r#"{"id": 1, "email": "a@b.c"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_bearer() {
        let session = Session::new(
            "abc".to_string(),
            User {
                id: "1".to_string(),
                email: "a@b.c".to_string(),
                name: "A".to_string(),
            },
        );
        assert_eq!(session.bearer(), "Bearer abc");
    }
}
