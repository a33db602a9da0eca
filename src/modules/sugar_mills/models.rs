use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::SUGAR_MILL_SCHEMA;
use crate::core::traits::{Entity, HardDelete};
use crate::core::{RecordStatus, Row, StoreFault};
use crate::repository::EntitySchema;

/// Current state of the mill's processing line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingStatus {
    Operational,
    Maintenance,
    Shutdown,
}

impl OperatingStatus {
    pub const VALUES: &'static [&'static str] = &["operational", "maintenance", "shutdown"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingStatus::Operational => "operational",
            OperatingStatus::Maintenance => "maintenance",
            OperatingStatus::Shutdown => "shutdown",
        }
    }
}

impl std::fmt::Display for OperatingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperatingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operational" => Ok(OperatingStatus::Operational),
            "maintenance" => Ok(OperatingStatus::Maintenance),
            "shutdown" => Ok(OperatingStatus::Shutdown),
            _ => Err(format!("Invalid operating status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SugarMill {
    pub id: i64,
    pub name: String,
    pub plant_code: String,
    pub location: Option<String>,
    /// Tonnes of cane per day
    pub capacity: Decimal,
    pub operating_status: Option<OperatingStatus>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub status: RecordStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Entity for SugarMill {
    const SCHEMA: &'static EntitySchema = &SUGAR_MILL_SCHEMA;

    fn from_row(row: &Row) -> Result<Self, StoreFault> {
        Ok(SugarMill {
            id: row.i64("id")?,
            name: row.string("name")?,
            plant_code: row.string("plant_code")?,
            location: row.opt_string("location")?,
            capacity: row.decimal("capacity")?,
            operating_status: row.opt_parsed("operating_status")?,
            contact_person: row.opt_string("contact_person")?,
            contact_number: row.opt_string("contact_number")?,
            email: row.opt_string("email")?,
            latitude: row.opt_decimal("latitude")?,
            longitude: row.opt_decimal("longitude")?,
            status: row.parsed("status")?,
            created_at: row.datetime("created_at")?,
            updated_at: row.datetime("updated_at")?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl HardDelete for SugarMill {}
