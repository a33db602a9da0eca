//! Statistics aggregator

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::schema::{EntitySchema, GroupBy, ID_COLUMN};
use crate::core::traits::StatementRunner;
use crate::core::{AppError, Result, Row, SqlValue};

/// Group label for rows whose categorical field is NULL
pub const UNSPECIFIED: &str = "unspecified";
/// Group label for rows whose reference field is NULL
pub const UNASSIGNED: &str = "unassigned";

/// Sums are rounded to this many places; REAL-backed stores add in binary
const SUM_SCALE: u32 = 4;

/// Counts and sums over every row of one entity table
///
/// Group maps and sums are flattened into the top level when serialized,
/// keyed by the names the schema declares (`byGender`, `totalFarmSize`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    #[serde(flatten)]
    pub groups: BTreeMap<String, BTreeMap<String, i64>>,
    #[serde(flatten)]
    pub sums: BTreeMap<String, Decimal>,
}

impl StatisticsReport {
    pub fn group(&self, key: &str) -> Option<&BTreeMap<String, i64>> {
        self.groups.get(key)
    }

    pub fn sum(&self, key: &str) -> Option<Decimal> {
        self.sums.get(key).copied()
    }

    /// Status counts and every group add up to `total`
    pub fn is_consistent(&self) -> bool {
        self.active + self.inactive == self.total
            && self
                .groups
                .values()
                .all(|counts| counts.values().sum::<i64>() == self.total)
    }
}

pub async fn aggregate<R>(runner: &R, schema: &EntitySchema) -> Result<StatisticsReport>
where
    R: StatementRunner + ?Sized,
{
    let mut report = StatisticsReport::default();
    let status = schema.status_column();

    let sql = format!(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(CASE WHEN {status} = ? THEN 1 ELSE 0 END), 0) AS active, \
         COALESCE(SUM(CASE WHEN {status} = ? THEN 1 ELSE 0 END), 0) AS inactive \
         FROM {table}",
        status = status,
        table = schema.table
    );
    let params = [
        SqlValue::from(schema.status.active),
        SqlValue::from(schema.status.inactive),
    ];
    if let Some(row) = runner.query(&sql, &params).await?.first() {
        report.total = row.i64("total")?;
        report.active = row.i64("active")?;
        report.inactive = row.i64("inactive")?;
    }

    for group in schema.statistics.groups {
        let counts = report.groups.entry(group.key().to_string()).or_default();
        let (sql, fallback) = group_query(schema, group)?;
        for row in runner.query(&sql, &[]).await? {
            let label = row.opt_string("label")?.unwrap_or_else(|| fallback.to_string());
            *counts.entry(label).or_insert(0) += row.i64("total")?;
        }
    }

    if !schema.statistics.sums.is_empty() {
        let mut selects = Vec::with_capacity(schema.statistics.sums.len());
        for (index, sum) in schema.statistics.sums.iter().enumerate() {
            let column = column_of(schema, sum.field)?;
            selects.push(format!("COALESCE(SUM({}), 0) AS sum_{}", column, index));
        }
        let sql = format!("SELECT {} FROM {}", selects.join(", "), schema.table);
        let rows = runner.query(&sql, &[]).await?;
        let row = rows.first().cloned().unwrap_or_else(Row::new);

        for (index, sum) in schema.statistics.sums.iter().enumerate() {
            let total = row
                .opt_decimal(&format!("sum_{}", index))?
                .unwrap_or(Decimal::ZERO)
                .round_dp(SUM_SCALE)
                .normalize();
            report.sums.insert(sum.key.to_string(), total);
        }
    }

    Ok(report)
}

fn group_query(schema: &EntitySchema, group: &GroupBy) -> Result<(String, &'static str)> {
    match group {
        GroupBy::Field { field, .. } => {
            let column = column_of(schema, field)?;
            Ok((
                format!(
                    "SELECT {column} AS label, COUNT(*) AS total FROM {table} GROUP BY {column}",
                    column = column,
                    table = schema.table
                ),
                UNSPECIFIED,
            ))
        }
        GroupBy::Related {
            field,
            table,
            label_column,
            ..
        } => {
            let column = column_of(schema, field)?;
            Ok((
                format!(
                    "SELECT r.{label} AS label, COUNT(*) AS total \
                     FROM {table} e LEFT JOIN {related} r ON r.{id} = e.{column} \
                     GROUP BY r.{label}",
                    label = label_column,
                    table = schema.table,
                    related = table,
                    id = ID_COLUMN,
                    column = column
                ),
                UNASSIGNED,
            ))
        }
    }
}

fn column_of(schema: &EntitySchema, field: &str) -> Result<&'static str> {
    schema.field(field).map(|f| f.column).ok_or_else(|| {
        AppError::configuration(format!("{}: unknown statistics field '{}'", schema.entity, field))
    })
}
