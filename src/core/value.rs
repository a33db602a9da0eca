use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use super::error::StoreFault;

/// A single bound parameter or decoded column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// True for NULL and for text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Bool(b) => Some(i64::from(*b)),
            SqlValue::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            SqlValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SqlValue::Decimal(d) => Some(*d),
            SqlValue::Int(v) => Some(Decimal::from(*v)),
            SqlValue::Float(f) => Decimal::from_f64(*f),
            SqlValue::Text(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SqlValue::Date(d) => Some(*d),
            SqlValue::DateTime(dt) => Some(dt.date()),
            SqlValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::DateTime(dt) => Some(*dt),
            SqlValue::Date(d) => d.and_hms_opt(0, 0, 0),
            SqlValue::Text(s) => {
                let s = s.trim();
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                    .ok()
            }
            _ => None,
        }
    }

    /// Value equality across representations
    ///
    /// Rows come back from different stores with different column types
    /// (DECIMAL vs REAL, DATE vs TEXT), so a stored value and a normalized
    /// payload value are compared by meaning rather than by variant.
    pub fn same_as(&self, other: &SqlValue) -> bool {
        match (self, other) {
            (SqlValue::Null, SqlValue::Null) => true,
            (SqlValue::Null, _) | (_, SqlValue::Null) => false,
            (SqlValue::Text(a), SqlValue::Text(b)) => a == b,
            (SqlValue::Bool(a), b) | (b, SqlValue::Bool(a)) => b.as_bool() == Some(*a),
            (SqlValue::Date(a), b) | (b, SqlValue::Date(a)) => b.as_date() == Some(*a),
            (SqlValue::DateTime(a), b) | (b, SqlValue::DateTime(a)) => b.as_datetime() == Some(*a),
            (a, b) => match (a.as_decimal(), b.as_decimal()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Int(v) => write!(f, "{}", v),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::Text(s) => write!(f, "{}", s),
            SqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            SqlValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::DateTime(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// A decoded result row, columns kept in select order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.columns.push((column.into(), value));
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(column, value.into());
        self
    }

    /// Column lookup is case-insensitive; drivers disagree on alias casing
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    /// Value of a column, NULL when the column was not selected
    pub fn value(&self, column: &str) -> SqlValue {
        self.get(column).cloned().unwrap_or(SqlValue::Null)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    fn required(&self, column: &str, expected: &str) -> Result<&SqlValue, StoreFault> {
        match self.get(column) {
            Some(value) if !value.is_null() => Ok(value),
            _ => Err(StoreFault::decode(column, expected)),
        }
    }

    pub fn i64(&self, column: &str) -> Result<i64, StoreFault> {
        self.required(column, "integer")?
            .as_i64()
            .ok_or_else(|| StoreFault::decode(column, "integer"))
    }

    pub fn opt_i64(&self, column: &str) -> Result<Option<i64>, StoreFault> {
        self.optional(column, "integer", SqlValue::as_i64)
    }

    pub fn string(&self, column: &str) -> Result<String, StoreFault> {
        match self.required(column, "text")? {
            SqlValue::Text(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }

    pub fn opt_string(&self, column: &str) -> Result<Option<String>, StoreFault> {
        match self.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(SqlValue::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    pub fn decimal(&self, column: &str) -> Result<Decimal, StoreFault> {
        self.required(column, "decimal")?
            .as_decimal()
            .ok_or_else(|| StoreFault::decode(column, "decimal"))
    }

    pub fn opt_decimal(&self, column: &str) -> Result<Option<Decimal>, StoreFault> {
        self.optional(column, "decimal", SqlValue::as_decimal)
    }

    pub fn bool(&self, column: &str) -> Result<bool, StoreFault> {
        self.required(column, "boolean")?
            .as_bool()
            .ok_or_else(|| StoreFault::decode(column, "boolean"))
    }

    pub fn opt_date(&self, column: &str) -> Result<Option<NaiveDate>, StoreFault> {
        self.optional(column, "date", SqlValue::as_date)
    }

    pub fn datetime(&self, column: &str) -> Result<NaiveDateTime, StoreFault> {
        self.required(column, "datetime")?
            .as_datetime()
            .ok_or_else(|| StoreFault::decode(column, "datetime"))
    }

    /// Text column parsed into a typed value such as a status enum
    pub fn parsed<T: FromStr>(&self, column: &str) -> Result<T, StoreFault> {
        self.string(column)?
            .parse()
            .map_err(|_| StoreFault::decode(column, std::any::type_name::<T>()))
    }

    pub fn opt_parsed<T: FromStr>(&self, column: &str) -> Result<Option<T>, StoreFault> {
        self.opt_string(column)?
            .map(|text| text.parse::<T>())
            .transpose()
            .map_err(|_| StoreFault::decode(column, std::any::type_name::<T>()))
    }

    fn optional<T>(
        &self,
        column: &str,
        expected: &str,
        convert: impl Fn(&SqlValue) -> Option<T>,
    ) -> Result<Option<T>, StoreFault> {
        match self.get(column) {
            None | Some(SqlValue::Null) => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| StoreFault::decode(column, expected)),
        }
    }
}
