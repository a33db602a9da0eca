//! Query executors backed by sqlx pools
//!
//! `MySqlExecutor` is the production store. `SqliteExecutor` serves the
//! embedded development mode and the test suite. Both translate driver
//! faults into [`StoreFault`] so nothing above this module sees sqlx types.

pub mod mysql;
pub mod sqlite;

pub use mysql::MySqlExecutor;
pub use sqlite::SqliteExecutor;

use crate::core::error::{FaultKind, StoreFault};
use crate::core::traits::QueryExecutor;

/// Reference DDL for the MySQL store
pub const MYSQL_SCHEMA: &str = include_str!("../../schema/mysql.sql");
/// Reference DDL for the embedded SQLite store
pub const SQLITE_SCHEMA: &str = include_str!("../../schema/sqlite.sql");

/// Classify sqlx errors that did not come from the database server itself
pub(crate) fn classify_transport(err: &sqlx::Error) -> StoreFault {
    match err {
        sqlx::Error::PoolTimedOut => {
            StoreFault::new(FaultKind::Connection, "POOL_TIMED_OUT", err.to_string())
        }
        sqlx::Error::PoolClosed => {
            StoreFault::new(FaultKind::Connection, "POOL_CLOSED", err.to_string())
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            StoreFault::new(FaultKind::Connection, "CONNECTION_LOST", err.to_string())
        }
        sqlx::Error::Configuration(_) => {
            StoreFault::new(FaultKind::Connection, "BAD_CONNECTION_CONFIG", err.to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreFault::new(FaultKind::Decode, "ROW_DECODE", err.to_string())
        }
        sqlx::Error::ColumnNotFound(_) | sqlx::Error::ColumnIndexOutOfBounds { .. } => {
            StoreFault::new(FaultKind::Decode, "COLUMN_NOT_FOUND", err.to_string())
        }
        _ => StoreFault::new(FaultKind::Other, "STORE_ERROR", err.to_string()),
    }
}

/// Name of the violated index in a duplicate-key message
///
/// MySQL: `Duplicate entry 'NOSPA' for key 'associations.uq_associations_name'`.
/// SQLite: `UNIQUE constraint failed: associations.name`.
pub(crate) fn duplicate_key_name(message: &str) -> Option<String> {
    const MYSQL_MARKER: &str = "for key '";
    const SQLITE_MARKER: &str = "constraint failed:";

    let raw = match (message.find(MYSQL_MARKER), message.find(SQLITE_MARKER)) {
        (Some(pos), _) => message[pos + MYSQL_MARKER.len()..].split('\'').next(),
        (None, Some(pos)) => message[pos + SQLITE_MARKER.len()..].split(',').next(),
        (None, None) => None,
    }?;

    let key = raw.trim().rsplit('.').next().unwrap_or(raw).trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

/// Run a `;`-separated DDL script statement by statement
///
/// Used for the bundled reference schema; comment lines are skipped.
pub async fn apply_script(executor: &dyn QueryExecutor, script: &str) -> Result<(), StoreFault> {
    let cleaned: String = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    for statement in cleaned.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        executor.execute(statement, &[]).await?;
    }

    Ok(())
}
