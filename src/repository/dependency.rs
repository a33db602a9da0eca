//! Dependency checker for hard deletes

use super::schema::EntitySchema;
use crate::core::traits::StatementRunner;
use crate::core::{AppError, BlockingDependency, Result, SqlValue};

/// Reference counts per dependency category, in declaration order
pub async fn count_dependents<R>(
    runner: &R,
    schema: &EntitySchema,
    id: i64,
) -> Result<Vec<BlockingDependency>>
where
    R: StatementRunner + ?Sized,
{
    let mut counts: Vec<BlockingDependency> = Vec::new();

    for edge in schema.dependencies {
        let sql = format!(
            "SELECT COUNT(*) AS total FROM {} WHERE {} = ?",
            edge.table, edge.column
        );
        let rows = runner.query(&sql, &[SqlValue::Int(id)]).await?;
        let count = match rows.first() {
            Some(row) => row.i64("total")?,
            None => 0,
        };

        match counts.iter_mut().find(|c| c.category == edge.category) {
            Some(existing) => existing.count += count,
            None => counts.push(BlockingDependency {
                category: edge.category.to_string(),
                count,
            }),
        }
    }

    Ok(counts)
}

/// Fail with every category that still references `id`
pub async fn check_dependents<R>(runner: &R, schema: &EntitySchema, id: i64) -> Result<()>
where
    R: StatementRunner + ?Sized,
{
    let blocking: Vec<BlockingDependency> = count_dependents(runner, schema, id)
        .await?
        .into_iter()
        .filter(|c| c.count > 0)
        .collect();

    if blocking.is_empty() {
        return Ok(());
    }

    Err(AppError::Dependency {
        entity: schema.entity.to_string(),
        blocking,
    })
}
