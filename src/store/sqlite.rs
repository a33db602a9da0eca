use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, Transaction, TypeInfo, ValueRef};
use tokio::sync::Mutex;

use super::{classify_transport, duplicate_key_name};
use crate::core::error::{FaultKind, StoreFault};
use crate::core::traits::{ExecOutcome, QueryExecutor, StatementRunner, TransactionScope};
use crate::core::value::{Row, SqlValue};

/// Query executor over an embedded SQLite database
///
/// SQLite keeps no DECIMAL or DATE storage class: decimals are stored as
/// REAL and dates as ISO-8601 text, and the lenient [`Row`] getters read
/// them back.
#[derive(Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Private in-memory database
    ///
    /// Every SQLite connection to `:memory:` opens a distinct database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StoreFault> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(classify)?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl StatementRunner for SqliteExecutor {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StoreFault> {
        tracing::debug!(sql, params = params.len(), "sqlite query");
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecOutcome, StoreFault> {
        tracing::debug!(sql, params = params.len(), "sqlite execute");
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(outcome(result.last_insert_rowid(), result.rows_affected()))
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn begin(&self) -> Result<Box<dyn TransactionScope>, StoreFault> {
        let tx = self.pool.begin().await.map_err(classify)?;
        Ok(Box::new(SqliteTransactionScope {
            tx: Mutex::new(Some(tx)),
        }))
    }
}

struct SqliteTransactionScope {
    tx: Mutex<Option<Transaction<'static, Sqlite>>>,
}

fn finished() -> StoreFault {
    StoreFault::new(
        FaultKind::Other,
        "TRANSACTION_FINISHED",
        "transaction already committed or rolled back",
    )
}

#[async_trait]
impl StatementRunner for SqliteTransactionScope {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StoreFault> {
        tracing::debug!(sql, params = params.len(), "sqlite query (tx)");
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut **tx)
            .await
            .map_err(classify)?;

        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecOutcome, StoreFault> {
        tracing::debug!(sql, params = params.len(), "sqlite execute (tx)");
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut **tx)
            .await
            .map_err(classify)?;

        Ok(outcome(result.last_insert_rowid(), result.rows_affected()))
    }
}

#[async_trait]
impl TransactionScope for SqliteTransactionScope {
    async fn commit(self: Box<Self>) -> Result<(), StoreFault> {
        let tx = self.tx.into_inner().ok_or_else(finished)?;
        tx.commit().await.map_err(classify)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreFault> {
        let tx = self.tx.into_inner().ok_or_else(finished)?;
        tx.rollback().await.map_err(classify)
    }
}

fn outcome(last_insert_rowid: i64, affected_rows: u64) -> ExecOutcome {
    ExecOutcome {
        inserted_id: Some(last_insert_rowid).filter(|id| *id != 0),
        affected_rows,
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Decimal(v) => query.bind(v.to_f64().unwrap_or_default()),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Date(v) => query.bind(*v),
            SqlValue::DateTime(v) => query.bind(*v),
        };
    }
    query
}

/// SQLite extended result codes the registry distinguishes
fn error_name(code: &str) -> &'static str {
    match code {
        "1555" => "SQLITE_CONSTRAINT_PRIMARYKEY",
        "2067" => "SQLITE_CONSTRAINT_UNIQUE",
        "787" => "SQLITE_CONSTRAINT_FOREIGNKEY",
        "1299" => "SQLITE_CONSTRAINT_NOTNULL",
        "275" => "SQLITE_CONSTRAINT_CHECK",
        "1" => "SQLITE_ERROR",
        "5" => "SQLITE_BUSY",
        "6" => "SQLITE_LOCKED",
        _ => "SQLITE_UNKNOWN",
    }
}

fn classify(err: sqlx::Error) -> StoreFault {
    let sqlx::Error::Database(db_err) = &err else {
        return classify_transport(&err);
    };

    let kind = if db_err.is_unique_violation() {
        FaultKind::DuplicateKey
    } else if db_err.is_foreign_key_violation() {
        FaultKind::ForeignKey
    } else {
        FaultKind::Other
    };

    let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
    let mut fault = StoreFault::new(kind, error_name(&code), db_err.message());
    if let Ok(number) = code.parse::<u16>() {
        fault = fault.with_errno(number);
    }
    if kind == FaultKind::DuplicateKey {
        if let Some(key) = duplicate_key_name(db_err.message()) {
            fault = fault.with_key(key);
        }
    }
    fault
}

fn decode_row(row: &SqliteRow) -> Result<Row, StoreFault> {
    let mut decoded = Row::new();

    for column in row.columns() {
        let index = column.ordinal();
        let name = column.name();
        let storage_class = {
            let raw = row.try_get_raw(index).map_err(classify)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_ascii_uppercase())
            }
        };

        let Some(storage_class) = storage_class else {
            decoded.push(name, SqlValue::Null);
            continue;
        };

        let value = decode_value(row, index, &storage_class)
            .map_err(|_| StoreFault::decode(name, &storage_class))?;
        decoded.push(name, value);
    }

    Ok(decoded)
}

// Decoding follows the storage class of the value, not the declared column
// type; the Row getters convert text dates and REAL decimals on read.
fn decode_value(row: &SqliteRow, index: usize, storage_class: &str) -> Result<SqlValue, sqlx::Error> {
    let value = match storage_class {
        "INTEGER" | "INT" | "INT8" | "BIGINT" | "BOOLEAN" => {
            SqlValue::Int(row.try_get_unchecked(index)?)
        }
        "REAL" | "NUMERIC" | "DOUBLE" => SqlValue::Float(row.try_get_unchecked(index)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get_unchecked(index)?;
            SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => SqlValue::Text(row.try_get_unchecked(index)?),
    };

    Ok(value)
}
