use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::schema::USER_PROFILE_SCHEMA;
use crate::core::traits::Entity;
use crate::core::{RecordStatus, Row, StoreFault};
use crate::repository::EntitySchema;

/// Back-office role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
    Viewer,
}

impl Role {
    pub const VALUES: &'static [&'static str] = &["admin", "manager", "staff", "viewer"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Profile of a back-office user
///
/// Authentication lives elsewhere; this is the registry's view of the
/// account. Its status is stored in `account_status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub position: Option<String>,
    pub department: Option<String>,
    pub contact_number: Option<String>,
    pub avatar_path: Option<String>,
    pub status: RecordStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Entity for UserProfile {
    const SCHEMA: &'static EntitySchema = &USER_PROFILE_SCHEMA;

    fn from_row(row: &Row) -> Result<Self, StoreFault> {
        Ok(UserProfile {
            id: row.i64("id")?,
            email: row.string("email")?,
            first_name: row.string("first_name")?,
            last_name: row.string("last_name")?,
            role: row.parsed("role")?,
            position: row.opt_string("position")?,
            department: row.opt_string("department")?,
            contact_number: row.opt_string("contact_number")?,
            avatar_path: row.opt_string("avatar_path")?,
            status: row.parsed("account_status")?,
            created_at: row.datetime("created_at")?,
            updated_at: row.datetime("updated_at")?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}
