use async_trait::async_trait;
use sqlx::mysql::{MySqlArguments, MySqlDatabaseError, MySqlPool, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row as _, Transaction, TypeInfo, ValueRef};
use tokio::sync::Mutex;

use super::{classify_transport, duplicate_key_name};
use crate::core::error::{FaultKind, StoreFault};
use crate::core::traits::{ExecOutcome, QueryExecutor, StatementRunner, TransactionScope};
use crate::core::value::{Row, SqlValue};

/// Query executor over a MySQL connection pool
#[derive(Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl StatementRunner for MySqlExecutor {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StoreFault> {
        tracing::debug!(sql, params = params.len(), "mysql query");
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecOutcome, StoreFault> {
        tracing::debug!(sql, params = params.len(), "mysql execute");
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(outcome(result.last_insert_id(), result.rows_affected()))
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn begin(&self) -> Result<Box<dyn TransactionScope>, StoreFault> {
        let tx = self.pool.begin().await.map_err(classify)?;
        Ok(Box::new(MySqlTransactionScope {
            tx: Mutex::new(Some(tx)),
        }))
    }
}

/// One open MySQL transaction
///
/// The sqlx transaction needs `&mut` access, the executor traits hand out
/// `&self`, so it sits behind an async mutex.
struct MySqlTransactionScope {
    tx: Mutex<Option<Transaction<'static, MySql>>>,
}

fn finished() -> StoreFault {
    StoreFault::new(
        FaultKind::Other,
        "TRANSACTION_FINISHED",
        "transaction already committed or rolled back",
    )
}

#[async_trait]
impl StatementRunner for MySqlTransactionScope {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StoreFault> {
        tracing::debug!(sql, params = params.len(), "mysql query (tx)");
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut **tx)
            .await
            .map_err(classify)?;

        rows.iter().map(decode_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecOutcome, StoreFault> {
        tracing::debug!(sql, params = params.len(), "mysql execute (tx)");
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut **tx)
            .await
            .map_err(classify)?;

        Ok(outcome(result.last_insert_id(), result.rows_affected()))
    }
}

#[async_trait]
impl TransactionScope for MySqlTransactionScope {
    async fn commit(self: Box<Self>) -> Result<(), StoreFault> {
        let tx = self.tx.into_inner().ok_or_else(finished)?;
        tx.commit().await.map_err(classify)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreFault> {
        let tx = self.tx.into_inner().ok_or_else(finished)?;
        tx.rollback().await.map_err(classify)
    }
}

fn outcome(last_insert_id: u64, affected_rows: u64) -> ExecOutcome {
    ExecOutcome {
        inserted_id: i64::try_from(last_insert_id).ok().filter(|id| *id != 0),
        affected_rows,
    }
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Decimal(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Date(v) => query.bind(*v),
            SqlValue::DateTime(v) => query.bind(*v),
        };
    }
    query
}

/// Symbolic names for the server error numbers the registry cares about
fn error_name(errno: u16) -> &'static str {
    match errno {
        1048 => "ER_BAD_NULL_ERROR",
        1054 => "ER_BAD_FIELD_ERROR",
        1062 => "ER_DUP_ENTRY",
        1064 => "ER_PARSE_ERROR",
        1146 => "ER_NO_SUCH_TABLE",
        1205 => "ER_LOCK_WAIT_TIMEOUT",
        1213 => "ER_LOCK_DEADLOCK",
        1264 => "ER_WARN_DATA_OUT_OF_RANGE",
        1366 => "ER_TRUNCATED_WRONG_VALUE_FOR_FIELD",
        1406 => "ER_DATA_TOO_LONG",
        1451 => "ER_ROW_IS_REFERENCED_2",
        1452 => "ER_NO_REFERENCED_ROW_2",
        1586 => "ER_DUP_ENTRY_WITH_KEY_NAME",
        _ => "ER_UNKNOWN",
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

    let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() else {
        return StoreFault::new(kind, "ER_UNKNOWN", db_err.message());
    };

    let errno = mysql_err.number();
    let mut fault = StoreFault::new(kind, error_name(errno), mysql_err.message()).with_errno(errno);
    if let Some(state) = mysql_err.code() {
        fault = fault.with_sql_state(state);
    }
    if kind == FaultKind::DuplicateKey {
        if let Some(key) = duplicate_key_name(mysql_err.message()) {
            fault = fault.with_key(key);
        }
    }
    fault
}

fn decode_row(row: &MySqlRow) -> Result<Row, StoreFault> {
    let mut decoded = Row::new();

    for column in row.columns() {
        let index = column.ordinal();
        let name = column.name();
        let raw = row.try_get_raw(index).map_err(classify)?;
        if raw.is_null() {
            decoded.push(name, SqlValue::Null);
            continue;
        }

        let type_name = column.type_info().name().to_ascii_uppercase();
        let value = decode_value(row, index, &type_name)
            .map_err(|_| StoreFault::decode(name, &type_name))?;
        decoded.push(name, value);
    }

    Ok(decoded)
}

fn decode_value(row: &MySqlRow, index: usize, type_name: &str) -> Result<SqlValue, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" => SqlValue::Bool(row.try_get(index)?),
        "TINYINT" => SqlValue::Int(row.try_get::<i8, _>(index)?.into()),
        "SMALLINT" => SqlValue::Int(row.try_get::<i16, _>(index)?.into()),
        "MEDIUMINT" | "INT" => SqlValue::Int(row.try_get::<i32, _>(index)?.into()),
        "BIGINT" => SqlValue::Int(row.try_get(index)?),
        "TINYINT UNSIGNED" => SqlValue::Int(row.try_get::<u8, _>(index)?.into()),
        "SMALLINT UNSIGNED" => SqlValue::Int(row.try_get::<u16, _>(index)?.into()),
        "MEDIUMINT UNSIGNED" | "INT UNSIGNED" => {
            SqlValue::Int(row.try_get::<u32, _>(index)?.into())
        }
        "BIGINT UNSIGNED" => {
            let v: u64 = row.try_get(index)?;
            i64::try_from(v).map_or(SqlValue::Decimal(v.into()), SqlValue::Int)
        }
        "YEAR" => SqlValue::Int(row.try_get::<u16, _>(index)?.into()),
        "FLOAT" => SqlValue::Float(row.try_get::<f32, _>(index)?.into()),
        "DOUBLE" => SqlValue::Float(row.try_get(index)?),
        "DECIMAL" => SqlValue::Decimal(row.try_get(index)?),
        "DATE" => SqlValue::Date(row.try_get(index)?),
        "DATETIME" | "TIMESTAMP" => SqlValue::DateTime(row.try_get(index)?),
        _ => match row.try_get::<String, _>(index) {
            Ok(text) => SqlValue::Text(text),
            Err(_) => {
                let bytes: Vec<u8> = row.try_get(index)?;
                SqlValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };

    Ok(value)
}
