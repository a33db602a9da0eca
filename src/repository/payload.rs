//! Caller payloads and their normalized form
//!
//! Payloads are JSON objects keyed by logical field names. `normalize` turns
//! one into [`FieldValues`]: typed, transformed values in schema order, with
//! absent fields left out entirely.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::schema::{EntitySchema, FieldDescriptor, FieldKind, Transform, RESERVED_FIELDS};
use crate::core::{AppError, Result, SqlValue};

/// Create/update request body restricted to logical field names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for Payload {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Payload(map)),
            _ => Err(AppError::invalid_request("Request body must be a JSON object")),
        }
    }
}

/// Normalized values for the fields present in a payload, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValues {
    entries: Vec<(&'static FieldDescriptor, SqlValue)>,
}

impl FieldValues {
    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(descriptor, _)| descriptor.name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Set a value, keeping schema order for new entries
    pub fn set(&mut self, schema: &EntitySchema, descriptor: &'static FieldDescriptor, value: SqlValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(d, _)| d.name == descriptor.name) {
            entry.1 = value;
            return;
        }

        let rank = |name: &str| schema.fields.iter().position(|f| f.name == name);
        let position = self
            .entries
            .iter()
            .position(|(d, _)| rank(d.name) > rank(descriptor.name))
            .unwrap_or(self.entries.len());
        self.entries.insert(position, (descriptor, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldDescriptor, &SqlValue)> {
        self.entries.iter().map(|(descriptor, value)| (*descriptor, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check payload keys against the schema and convert every present field
pub fn normalize(schema: &'static EntitySchema, payload: &Payload) -> Result<FieldValues> {
    for key in payload.keys() {
        if schema.field(key).is_some() {
            continue;
        }
        if RESERVED_FIELDS.contains(&key) {
            return Err(AppError::validation(key, format!("{} cannot be set by the caller", key)));
        }
        return Err(AppError::validation(
            key,
            format!("Unknown field '{}' for {}", key, schema.entity),
        ));
    }

    let mut values = FieldValues::default();
    for field in schema.fields {
        if let Some(raw) = payload.get(field.name) {
            let value = convert(field, raw)?;
            values.entries.push((field, value));
        }
    }

    Ok(values)
}

/// Convert one JSON value to the field's storage value
///
/// Applies the field's transform; empty strings become NULL for every kind
/// except free text.
pub fn convert(field: &FieldDescriptor, raw: &Value) -> Result<SqlValue> {
    let invalid = || {
        AppError::validation(
            field.name,
            format!("{} must be a valid {}", field.label(), field.kind.describe()),
        )
    };

    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    if let Value::String(s) = raw {
        if s.trim().is_empty() && field.kind != FieldKind::Text {
            return Ok(SqlValue::Null);
        }
    }

    let value = match field.kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Enum(_) => {
            let text = match raw {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return Err(invalid()),
            };
            SqlValue::Text(apply_transform(field, text))
        }
        FieldKind::Integer | FieldKind::Reference => {
            let number = match raw {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            SqlValue::Int(number.ok_or_else(invalid)?)
        }
        FieldKind::Decimal | FieldKind::Latitude | FieldKind::Longitude => {
            let number = match raw {
                Value::Number(n) => parse_decimal(&n.to_string()),
                Value::String(s) => parse_decimal(s.trim()),
                _ => None,
            };
            SqlValue::Decimal(number.ok_or_else(invalid)?)
        }
        FieldKind::Date => {
            let Value::String(s) = raw else {
                return Err(invalid());
            };
            SqlValue::Date(parse_day(s.trim()).ok_or_else(invalid)?)
        }
        FieldKind::Bool => {
            let flag = match raw {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => n.as_i64().and_then(|v| match v {
                    0 => Some(false),
                    1 => Some(true),
                    _ => None,
                }),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => Some(true),
                    "false" | "0" | "no" => Some(false),
                    _ => None,
                },
                _ => None,
            };
            SqlValue::Bool(flag.ok_or_else(invalid)?)
        }
    };

    Ok(value)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn apply_transform(field: &FieldDescriptor, text: String) -> String {
    let text = match field.transform {
        Transform::None => text,
        Transform::Lowercase => text.to_lowercase(),
        Transform::Uppercase => text.to_uppercase(),
        Transform::Aliases(aliases) => aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(&text))
            .map_or(text, |(_, canonical)| canonical.to_string()),
    };

    // Enum values are stored in their declared spelling
    match field.kind {
        FieldKind::Enum(allowed) => allowed
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(&text))
            .map_or(text, |candidate| candidate.to_string()),
        _ => text,
    }
}

/// `YYYY-MM-DD`, or a full timestamp from a date picker reduced to its day
fn parse_day(text: &str) -> Option<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }

    let local = text.strip_suffix('Z').unwrap_or(text);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .map(|stamp| stamp.date())
}
