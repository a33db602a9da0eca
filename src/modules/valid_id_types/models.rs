use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::schema::VALID_ID_TYPE_SCHEMA;
use crate::core::traits::{Entity, HardDelete};
use crate::core::{RecordStatus, Row, SqlValue, StoreFault};
use crate::repository::EntitySchema;

/// Issuer class of an identity document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdCategory {
    Government,
    Private,
    Other,
}

impl IdCategory {
    pub const VALUES: &'static [&'static str] = &["government", "private", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdCategory::Government => "government",
            IdCategory::Private => "private",
            IdCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for IdCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IdCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "government" => Ok(IdCategory::Government),
            "private" => Ok(IdCategory::Private),
            "other" => Ok(IdCategory::Other),
            _ => Err(format!("Invalid ID category: {}", s)),
        }
    }
}

/// Identity document accepted when registering planters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidIdType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<IdCategory>,
    pub requires_expiry: bool,
    pub status: RecordStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Entity for ValidIdType {
    const SCHEMA: &'static EntitySchema = &VALID_ID_TYPE_SCHEMA;

    fn from_row(row: &Row) -> Result<Self, StoreFault> {
        Ok(ValidIdType {
            id: row.i64("id")?,
            name: row.string("name")?,
            description: row.opt_string("description")?,
            category: row.opt_parsed("category")?,
            // NULL reads as "no expiry date required"
            requires_expiry: row
                .get("requires_expiry")
                .and_then(SqlValue::as_bool)
                .unwrap_or(false),
            status: row.parsed("status")?,
            created_at: row.datetime("created_at")?,
            updated_at: row.datetime("updated_at")?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl HardDelete for ValidIdType {}
