use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::core::error::{AppError, StoreFault};
use crate::core::value::{Row, SqlValue};

/// Result of a parametrized write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Id assigned by the store to an inserted row
    pub inserted_id: Option<i64>,
    pub affected_rows: u64,
}

/// Parametrized reads and writes against a relational store
///
/// Statements use `?` placeholders; params bind in order.
#[async_trait]
pub trait StatementRunner: Send + Sync {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, StoreFault>;

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<ExecOutcome, StoreFault>;
}

/// A connection scoped to one transaction
#[async_trait]
pub trait TransactionScope: StatementRunner {
    async fn commit(self: Box<Self>) -> Result<(), StoreFault>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreFault>;
}

/// Entry point repositories are constructed with
///
/// Implementations own their connections and classify every driver fault
/// into a [`StoreFault`] before it reaches the repository layer.
#[async_trait]
pub trait QueryExecutor: StatementRunner {
    async fn begin(&self) -> Result<Box<dyn TransactionScope>, StoreFault>;

    /// Cheap round trip used by readiness checks
    async fn ping(&self) -> Result<(), StoreFault> {
        self.query("SELECT 1", &[]).await.map(|_| ())
    }
}

impl dyn QueryExecutor {
    /// Run `work` on a scoped connection
    ///
    /// Commits when `work` succeeds and rolls back on any error, returning
    /// the error from `work` unchanged.
    pub async fn transaction<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send,
        F: for<'t> FnOnce(&'t dyn TransactionScope) -> BoxFuture<'t, Result<T, AppError>> + Send,
    {
        let scope = self.begin().await?;
        let outcome = work(scope.as_ref()).await;

        match outcome {
            Ok(value) => {
                scope.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(fault) = scope.rollback().await {
                    tracing::warn!("Rollback failed after {}: {}", err, fault);
                }
                Err(err)
            }
        }
    }
}
