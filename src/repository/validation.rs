//! Validation engine
//!
//! Field rules run on every value present in the payload; required and
//! cross-field rules run on the merged view, so an update that leaves a
//! required field alone does not trip over it.

use rust_decimal::{Decimal, RoundingStrategy};

use super::payload::FieldValues;
use super::schema::{CrossRule, EntitySchema, FieldDescriptor, FieldKind};
use crate::core::{AppError, Result, Row, SqlValue};

/// What the payload is validated against
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    Create,
    /// Existing stored row the patch is overlaid on
    Update { existing: &'a Row },
}

impl Mode<'_> {
    fn merged(&self, values: &FieldValues, field: &FieldDescriptor) -> SqlValue {
        match values.get(field.name) {
            Some(value) => value.clone(),
            None => match self {
                Mode::Create => SqlValue::Null,
                Mode::Update { existing } => existing.value(field.column),
            },
        }
    }
}

pub fn validate(schema: &EntitySchema, values: &FieldValues, mode: Mode<'_>) -> Result<()> {
    for (field, value) in values.iter() {
        check_field(field, value)?;
    }

    for field in schema.fields.iter().filter(|f| f.required) {
        if mode.merged(values, field).is_blank() {
            return Err(AppError::validation(
                field.name,
                format!("{} is required", field.label()),
            ));
        }
    }

    for rule in schema.rules {
        match rule {
            CrossRule::Together(names) => check_together(schema, values, mode, names)?,
        }
    }

    Ok(())
}

/// Rules for a single present value; NULL passes everything but `required`
pub fn check_field(field: &FieldDescriptor, value: &SqlValue) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    if let (Some(max), Some(text)) = (field.max_len, value.as_str()) {
        if text.chars().count() > max {
            return Err(AppError::validation(
                field.name,
                format!("{} must be at most {} characters", field.label(), max),
            ));
        }
    }

    match field.kind {
        FieldKind::Email => {
            let text = value.as_str().unwrap_or_default();
            if !text.is_empty() && !is_email(text) {
                return Err(AppError::validation(
                    field.name,
                    format!("{} must be a valid email address", field.label()),
                ));
            }
        }
        FieldKind::Latitude => check_range(field, value, 90)?,
        FieldKind::Longitude => check_range(field, value, 180)?,
        FieldKind::Enum(allowed) => {
            let text = value.as_str().unwrap_or_default();
            if !allowed.contains(&text) {
                return Err(AppError::validation(
                    field.name,
                    format!("{} must be one of: {}", field.label(), allowed.join(", ")),
                ));
            }
        }
        _ => {}
    }

    if field.non_negative {
        if let Some(number) = value.as_decimal() {
            if number.is_sign_negative() && !number.is_zero() {
                return Err(AppError::validation(
                    field.name,
                    format!("{} cannot be negative", field.label()),
                ));
            }
        }
    }

    if let (Some((precision, scale)), Some(number)) = (field.precision, value.as_decimal()) {
        check_precision(field, number, precision, scale)?;
    }

    if let (Some(max), Some(number)) = (field.max_value, value.as_i64()) {
        if number.unsigned_abs() > max.unsigned_abs() {
            return Err(out_of_bounds(field, Decimal::from(max)));
        }
    }

    Ok(())
}

/// Magnitude must fit the column once rounded to its scale the way the store does
fn check_precision(
    field: &FieldDescriptor,
    number: Decimal,
    precision: u32,
    scale: u32,
) -> Result<()> {
    let largest = 10_i128
        .checked_pow(precision)
        .and_then(|limit| Decimal::try_from_i128_with_scale(limit - 1, scale).ok());
    let Some(largest) = largest else {
        return Ok(());
    };

    let stored = number
        .abs()
        .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    if stored > largest {
        return Err(out_of_bounds(field, largest));
    }
    Ok(())
}

fn out_of_bounds(field: &FieldDescriptor, largest: Decimal) -> AppError {
    let message = if field.non_negative {
        format!("{} must be at most {}", field.label(), largest)
    } else {
        format!("{} must be between -{} and {}", field.label(), largest, largest)
    };
    AppError::validation(field.name, message)
}

fn check_range(field: &FieldDescriptor, value: &SqlValue, bound: i64) -> Result<()> {
    let bound = Decimal::from(bound);
    match value.as_decimal() {
        Some(degrees) if degrees >= -bound && degrees <= bound => Ok(()),
        _ => Err(AppError::validation(
            field.name,
            format!("{} must be between -{} and {}", field.label(), bound, bound),
        )),
    }
}

fn check_together(
    schema: &EntitySchema,
    values: &FieldValues,
    mode: Mode<'_>,
    names: &[&'static str],
) -> Result<()> {
    let fields: Vec<&FieldDescriptor> = names.iter().filter_map(|n| schema.field(n)).collect();
    let present: Vec<bool> = fields
        .iter()
        .map(|f| !mode.merged(values, f).is_null())
        .collect();

    if present.iter().all(|p| *p) || present.iter().all(|p| !*p) {
        return Ok(());
    }

    let missing = fields
        .iter()
        .zip(&present)
        .find(|(_, present)| !**present)
        .map(|(f, _)| *f);
    let labels: Vec<String> = fields.iter().map(|f| f.label().to_lowercase()).collect();

    match missing {
        Some(field) => Err(AppError::validation(
            field.name,
            format!("{} must be provided together", labels.join(" and ")),
        )),
        None => Ok(()),
    }
}

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = text.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
