//! Database migrations

use rusqlite::{Connection, OptionalExtension};

use crate::error::StorageError;
use crate::Result;

/// Ordered schema steps; a database at version N has applied the first N.
const MIGRATIONS: &[(&str, &str)] = &[(
    "key-value store",
    r#"
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
)];

const SCHEMA_VERSION: i32 = MIGRATIONS.len() as i32;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let current_version = get_schema_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            current_version, SCHEMA_VERSION
        )));
    }

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
        let version = index as i32 + 1;
        tracing::info!(version, name = %name, "Running migration");

        conn.execute_batch("BEGIN")?;
        let applied = conn
            .execute_batch(sql)
            .and_then(|_| set_schema_version(conn, version));
        match applied {
            Ok(()) => conn.execute_batch("COMMIT")?,
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StorageError::Migration(format!(
                    "migration v{} ({}) failed: {}",
                    version, name, e
                )));
            }
        }
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}
