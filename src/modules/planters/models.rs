use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::PLANTER_SCHEMA;
use crate::core::traits::Entity;
use crate::core::{RecordStatus, Row, StoreFault};
use crate::repository::EntitySchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const VALUES: &'static [&'static str] = &["male", "female"];

    pub const ALIASES: &'static [(&'static str, &'static str)] = &[("m", "male"), ("f", "female")];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// Registered cane planter and their farm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Planter {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub association_id: Option<i64>,
    pub farm_location: Option<String>,
    /// Hectares
    pub farm_size: Option<Decimal>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub status: RecordStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Planter {
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

impl Entity for Planter {
    const SCHEMA: &'static EntitySchema = &PLANTER_SCHEMA;

    fn from_row(row: &Row) -> Result<Self, StoreFault> {
        Ok(Planter {
            id: row.i64("id")?,
            first_name: row.string("first_name")?,
            middle_name: row.opt_string("middle_name")?,
            last_name: row.string("last_name")?,
            gender: row.opt_parsed("gender")?,
            birth_date: row.opt_date("birth_date")?,
            contact_number: row.opt_string("contact_number")?,
            email: row.opt_string("email")?,
            address: row.opt_string("address")?,
            association_id: row.opt_i64("association_id")?,
            farm_location: row.opt_string("farm_location")?,
            farm_size: row.opt_decimal("farm_size")?,
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
