//! Read-only access to the relational content store.
//!
//! Connections are opened per request with conservative defaults:
//! - `SQLITE_OPEN_READ_ONLY` since the resolver never writes
//! - `busy_timeout = 5s` to ride out writers holding the database lock
//! - required tables are checked up front so a wrong prefix fails fast

pub mod schema;
pub mod store;

use rusqlite::{Connection, OpenFlags};
use std::{path::Path, time::Duration};

use crate::error::StoreError;

pub use store::{Direction, DisplayRecord, EditTarget, RelationStore, SqliteStore};

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open an existing store file read-only and verify its schema.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if the file does not exist,
/// [`StoreError::Open`] if SQLite cannot open it, and
/// [`StoreError::MissingTable`] if a required table is absent.
pub fn open_store(path: &Path, prefix: &str) -> Result<Connection, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)
        .map_err(StoreError::query("configure busy timeout"))?;
    verify_schema(&conn, prefix)?;

    Ok(conn)
}

/// Check that every table in [`schema::REQUIRED_TABLES`] exists.
///
/// # Errors
///
/// Returns [`StoreError::MissingTable`] naming the first absent table.
pub fn verify_schema(conn: &Connection, prefix: &str) -> Result<(), StoreError> {
    validate_prefix(prefix)?;

    let mut stmt = conn
        .prepare("SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)")
        .map_err(StoreError::query("prepare schema check"))?;

    for table in schema::REQUIRED_TABLES {
        let name = format!("{prefix}{table}");
        let exists: bool = stmt
            .query_row([&name], |row| row.get(0))
            .map_err(StoreError::query("schema check"))?;
        if !exists {
            return Err(StoreError::MissingTable(name));
        }
    }
    Ok(())
}

/// Table prefixes are spliced into SQL text, so only identifier characters
/// are accepted.
pub(crate) fn validate_prefix(prefix: &str) -> Result<(), StoreError> {
    if prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(StoreError::InvalidPrefix(prefix.to_string()))
    }
}
