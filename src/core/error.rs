use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::fmt;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Classification of a store fault, decided by the executor implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// A unique index rejected the write
    DuplicateKey,
    /// A foreign key rejected the write or delete
    ForeignKey,
    /// The store could not be reached or the connection was lost
    Connection,
    /// A row came back in a shape the caller could not decode
    Decode,
    /// Anything else (syntax, missing table, data truncation, ...)
    Other,
}

/// A fault raised by the query executor
///
/// Carries the symbolic code, the vendor's numeric code and the SQLSTATE so a
/// caller can decide on retry policy without looking at driver types.
#[derive(thiserror::Error, Debug, Clone, Serialize)]
#[error("{code}: {message}")]
pub struct StoreFault {
    pub kind: FaultKind,
    pub code: String,
    pub errno: Option<u16>,
    pub sql_state: Option<String>,
    pub message: String,

    /// Violated index name, when the store reports one for a duplicate key
    #[serde(skip)]
    pub key: Option<String>,
}

impl StoreFault {
    pub fn new(kind: FaultKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            errno: None,
            sql_state: None,
            message: message.into(),
            key: None,
        }
    }

    pub fn with_errno(mut self, errno: u16) -> Self {
        self.errno = Some(errno);
        self
    }

    pub fn with_sql_state(mut self, sql_state: impl Into<String>) -> Self {
        self.sql_state = Some(sql_state.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// A column was missing or held a value of the wrong type
    pub fn decode(column: &str, expected: &str) -> Self {
        Self::new(
            FaultKind::Decode,
            "ROW_DECODE",
            format!("column '{}' could not be read as {}", column, expected),
        )
    }

    pub fn is_duplicate_key(&self) -> bool {
        self.kind == FaultKind::DuplicateKey
    }
}

/// One category of rows still referencing an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingDependency {
    pub category: String,
    pub count: i64,
}

impl fmt::Display for BlockingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category, self.count)
    }
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Caller-correctable input problems, uniqueness conflicts included.
    /// `field` is `None` when the request as a whole is at fault.
    #[error("Validation error: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Hard delete refused while other rows still reference the entity
    #[error("Dependency error: {entity} is still referenced by {}", join_blocking(.blocking))]
    Dependency {
        entity: String,
        blocking: Vec<BlockingDependency>,
    },

    /// Store fault not otherwise classified
    #[error("Database error: {0}")]
    Database(#[from] StoreFault),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn join_blocking(blocking: &[BlockingDependency]) -> String {
    blocking
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let mut body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        });

        match self {
            AppError::Validation {
                field: Some(field), ..
            } => {
                body["error"]["field"] = serde_json::json!(field);
            }
            AppError::Dependency { blocking, .. } => {
                body["error"]["blocking"] = serde_json::json!(blocking);
            }
            AppError::Database(fault) => {
                body["error"]["store"] = serde_json::json!(fault);
            }
            _ => {}
        }

        HttpResponse::build(status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Dependency { .. } => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::Validation {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    /// Validation failure not tied to a single field
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        AppError::Validation {
            field: None,
            message: msg.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    /// Field named by a validation failure, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            AppError::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}
