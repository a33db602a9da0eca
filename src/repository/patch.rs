//! Update-patch builder

use super::payload::FieldValues;
use super::schema::EntitySchema;
use crate::core::{AppError, Result, SqlValue};

/// Column assignments for an UPDATE, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub columns: Vec<&'static str>,
    pub values: Vec<SqlValue>,
}

impl Patch {
    pub fn push(&mut self, column: &'static str, value: SqlValue) {
        self.columns.push(column);
        self.values.push(value);
    }

    /// `a = ?, b = ?`
    pub fn assignments(&self) -> String {
        self.columns
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Build the sparse patch for the fields present in `values`
///
/// Fields absent from the payload never appear. An empty patch is an error:
/// an update has to change something.
pub fn build_patch(schema: &EntitySchema, values: &FieldValues) -> Result<Patch> {
    let mut patch = Patch::default();

    for field in schema.fields {
        if let Some(value) = values.get(field.name) {
            patch.push(field.column, value.clone());
        }
    }

    if patch.is_empty() {
        return Err(AppError::invalid_request(format!(
            "No {} fields to update",
            schema.entity.to_lowercase()
        )));
    }

    Ok(patch)
}
