use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schema::ASSOCIATION_SCHEMA;
use crate::core::traits::{Entity, HardDelete};
use crate::core::{RecordStatus, Row, StoreFault};
use crate::repository::EntitySchema;

/// How often members pay association dues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuesFrequency {
    Monthly,
    Quarterly,
    Annually,
}

impl DuesFrequency {
    pub const VALUES: &'static [&'static str] = &["monthly", "quarterly", "annually"];

    /// Spellings accepted from callers and stored canonically
    pub const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("month", "monthly"),
        ("quarter", "quarterly"),
        ("annual", "annually"),
        ("yearly", "annually"),
        ("year", "annually"),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DuesFrequency::Monthly => "monthly",
            DuesFrequency::Quarterly => "quarterly",
            DuesFrequency::Annually => "annually",
        }
    }
}

impl std::fmt::Display for DuesFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DuesFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(DuesFrequency::Monthly),
            "quarterly" => Ok(DuesFrequency::Quarterly),
            "annually" => Ok(DuesFrequency::Annually),
            _ => Err(format!("Invalid dues frequency: {}", s)),
        }
    }
}

/// Planters' association registered with the mill district
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Association {
    pub id: i64,
    pub name: String,
    pub acronym: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub date_established: Option<NaiveDate>,
    pub member_count: Option<i64>,
    pub dues_amount: Option<Decimal>,
    pub dues_frequency: Option<DuesFrequency>,
    pub status: RecordStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Entity for Association {
    const SCHEMA: &'static EntitySchema = &ASSOCIATION_SCHEMA;

    fn from_row(row: &Row) -> Result<Self, StoreFault> {
        Ok(Association {
            id: row.i64("id")?,
            name: row.string("name")?,
            acronym: row.opt_string("acronym")?,
            address: row.opt_string("address")?,
            contact_person: row.opt_string("contact_person")?,
            contact_number: row.opt_string("contact_number")?,
            email: row.opt_string("email")?,
            date_established: row.opt_date("date_established")?,
            member_count: row.opt_i64("total_members")?,
            dues_amount: row.opt_decimal("membership_dues")?,
            dues_frequency: row.opt_parsed("dues_frequency")?,
            status: row.parsed("status")?,
            created_at: row.datetime("created_at")?,
            updated_at: row.datetime("updated_at")?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl HardDelete for Association {}
