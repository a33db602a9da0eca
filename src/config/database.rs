use crate::core::traits::QueryExecutor;
use crate::core::{AppError, Result};
use crate::store::{self, MySqlExecutor, SqliteExecutor};
use serde::Deserialize;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Store backend selected by the `DATABASE_URL` scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Run the bundled reference DDL after connecting
    pub apply_schema: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            pool_size: env::var("DATABASE_POOL_SIZE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid DATABASE_POOL_SIZE".to_string())
                })?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid DATABASE_MAX_CONNECTIONS".to_string())
                })?,
            acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid DATABASE_ACQUIRE_TIMEOUT_SECS".to_string())
                })?,
            apply_schema: env::var("DATABASE_APPLY_SCHEMA")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    pub fn backend(&self) -> Result<Backend> {
        if self.url.starts_with("mysql://") {
            Ok(Backend::MySql)
        } else if self.url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else {
            Err(AppError::Configuration(
                "DATABASE_URL must start with mysql:// or sqlite:".to_string(),
            ))
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.backend()?;

        if self.max_connections == 0 {
            return Err(AppError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        if self.pool_size > self.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(())
    }

    /// Connect the configured backend and wrap it as a query executor
    pub async fn create_executor(&self) -> Result<Arc<dyn QueryExecutor>> {
        let executor: Arc<dyn QueryExecutor> = match self.backend()? {
            Backend::MySql => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(self.max_connections)
                    .min_connections(self.pool_size)
                    .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
                    .idle_timeout(Duration::from_secs(600)) // 10 minutes
                    .max_lifetime(Duration::from_secs(1800)) // 30 minutes
                    .test_before_acquire(true)
                    .connect(&self.url)
                    .await
                    .map_err(|e| AppError::Database(store::classify_transport(&e)))?;
                Arc::new(MySqlExecutor::new(pool))
            }
            Backend::Sqlite => {
                let options = SqliteConnectOptions::from_str(&self.url)
                    .map_err(|e| AppError::Configuration(format!("Invalid DATABASE_URL: {}", e)))?
                    .create_if_missing(true)
                    .foreign_keys(true);
                // Each connection to an in-memory database gets its own copy
                let max_connections = if self.url.contains(":memory:") {
                    1
                } else {
                    self.max_connections
                };
                let pool = SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
                    .map_err(|e| AppError::Database(store::classify_transport(&e)))?;
                Arc::new(SqliteExecutor::new(pool))
            }
        };

        if self.apply_schema {
            let script = match self.backend()? {
                Backend::MySql => store::MYSQL_SCHEMA,
                Backend::Sqlite => store::SQLITE_SCHEMA,
            };
            store::apply_script(executor.as_ref(), script).await?;
            tracing::info!("Reference schema applied");
        }

        Ok(executor)
    }
}
