//! Uniqueness checker
//!
//! Counts rows holding a value without regard to their status: a
//! soft-deleted row keeps its unique value, so a deactivated association's
//! name still blocks a new association of the same name. This mirrors the
//! unique index in the store, which also sees inactive rows.

use super::schema::{EntitySchema, FieldDescriptor, ID_COLUMN};
use crate::core::traits::StatementRunner;
use crate::core::{AppError, Result, SqlValue};

/// Fail if another row of `schema.table` already holds `value` in `field`
///
/// NULL is never a conflict. `exclude_id` skips the row being updated.
pub async fn check_unique<R>(
    runner: &R,
    schema: &EntitySchema,
    field: &FieldDescriptor,
    value: &SqlValue,
    exclude_id: Option<i64>,
) -> Result<()>
where
    R: StatementRunner + ?Sized,
{
    if value.is_null() {
        return Ok(());
    }

    let mut sql = format!(
        "SELECT COUNT(*) AS total FROM {} WHERE {} = ?",
        schema.table, field.column
    );
    let mut params = vec![value.clone()];
    if let Some(id) = exclude_id {
        sql.push_str(&format!(" AND {} <> ?", ID_COLUMN));
        params.push(SqlValue::Int(id));
    }

    let rows = runner.query(&sql, &params).await?;
    let count = match rows.first() {
        Some(row) => row.i64("total")?,
        None => 0,
    };

    if count > 0 {
        return Err(duplicate_error(schema, field, value));
    }

    Ok(())
}

/// The one error shape for a uniqueness conflict, whichever path found it
pub fn duplicate_error(schema: &EntitySchema, field: &FieldDescriptor, value: &SqlValue) -> AppError {
    AppError::validation(
        field.name,
        format!(
            "{} with {} '{}' already exists",
            schema.entity,
            field.label().to_lowercase(),
            value
        ),
    )
}
