//! Generic entity repository
//!
//! One implementation serves every entity type: the schema attached to the
//! entity drives validation, uniqueness, patches, deletion and statistics.
//! Every write is followed by a fresh read inside the same transaction, and
//! that read is what the caller gets back. A row that cannot be read back
//! rolls the write back.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};

use super::dependency::check_dependents;
use super::filter::{build_where, ListFilter};
use super::patch::build_patch;
use super::payload::{convert, normalize, FieldValues, Payload};
use super::schema::{DeleteMode, EntitySchema, CREATED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN};
use super::statistics::{aggregate, StatisticsReport};
use super::uniqueness::{check_unique, duplicate_error};
use super::validation::{validate, Mode};
use crate::core::traits::{Entity, HardDelete, QueryExecutor, StatementRunner};
use crate::core::{AppError, FaultKind, Result, Row, SqlValue, StoreFault};

/// Repository for one entity type over an injected executor
pub struct EntityRepository<E: Entity> {
    executor: Arc<dyn QueryExecutor>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityRepository<E> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.executor))
    }
}

impl<E: Entity> EntityRepository<E> {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            _entity: PhantomData,
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        E::SCHEMA
    }

    /// List rows matching `filter`, newest first
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<E>> {
        let schema = E::SCHEMA;
        let (clause, params) = build_where(schema, filter)?;
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} DESC, {} DESC{}",
            schema.select_list(),
            schema.table,
            clause,
            CREATED_AT_COLUMN,
            ID_COLUMN,
            filter.page_clause()
        );

        let rows = self.executor.query(&sql, &params).await?;
        rows.iter()
            .map(|row| E::from_row(row).map_err(AppError::from))
            .collect()
    }

    /// Find by id; inactive rows are returned like any other
    pub async fn get_by_id(&self, id: i64) -> Result<Option<E>> {
        let row = fetch_row(&*self.executor, E::SCHEMA, id).await?;
        row.map(|row| E::from_row(&row).map_err(AppError::from))
            .transpose()
    }

    /// Find by the entity's natural key (plant code, email, name)
    ///
    /// The lookup value goes through the field's transform, so
    /// `"urs-01"` finds plant code `URS-01`.
    pub async fn get_by_natural_key(&self, value: &str) -> Result<Option<E>> {
        let schema = E::SCHEMA;
        let field = schema.field(schema.natural_key).ok_or_else(|| {
            AppError::configuration(format!("{}: natural key is not a field", schema.entity))
        })?;

        let key = convert(field, &Value::String(value.to_string()))?;
        if key.is_blank() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            schema.select_list(),
            schema.table,
            field.column
        );
        let rows = self.executor.query(&sql, &[key]).await?;
        rows.first()
            .map(|row| E::from_row(row).map_err(AppError::from))
            .transpose()
    }

    #[tracing::instrument(name = "create", skip(self, payload), fields(entity = E::SCHEMA.entity))]
    pub async fn create(&self, payload: &Payload) -> Result<E> {
        let schema = E::SCHEMA;
        let mut values = normalize(schema, payload)?;

        if let Some(status) = schema.status_field() {
            if values.get(status.name).map_or(true, SqlValue::is_blank) {
                values.set(schema, status, SqlValue::from(schema.status.active));
            }
        }

        validate(schema, &values, Mode::Create)?;

        for field in schema.unique_fields() {
            if let Some(value) = values.get(field.name) {
                check_unique(&*self.executor, schema, field, value, None).await?;
            }
        }

        let now = timestamp();
        let mut columns: Vec<&str> = Vec::with_capacity(values.len() + 2);
        let mut params: Vec<SqlValue> = Vec::with_capacity(values.len() + 2);
        for (field, value) in values.iter() {
            columns.push(field.column);
            params.push(value.clone());
        }
        columns.extend([CREATED_AT_COLUMN, UPDATED_AT_COLUMN]);
        params.extend([SqlValue::DateTime(now), SqlValue::DateTime(now)]);

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            schema.table,
            columns.join(", "),
            vec!["?"; columns.len()].join(", ")
        );
        let created: E = self
            .executor
            .transaction(move |scope| {
                Box::pin(async move {
                    let outcome = scope
                        .execute(&sql, &params)
                        .await
                        .map_err(|fault| map_write_fault(schema, fault, &values))?;

                    let id = outcome.inserted_id.ok_or_else(|| {
                        StoreFault::new(
                            FaultKind::Other,
                            "NO_INSERT_ID",
                            "store did not report an id",
                        )
                    })?;

                    read_back(scope, id).await
                })
            })
            .await?;

        info!(
            entity = schema.entity,
            id = created.id(),
            "Created {}",
            schema.entity.to_lowercase()
        );
        Ok(created)
    }

    /// Apply a partial update; fields absent from `payload` keep their values
    #[tracing::instrument(name = "update", skip(self, payload), fields(entity = E::SCHEMA.entity))]
    pub async fn update(&self, id: i64, payload: &Payload) -> Result<E> {
        let schema = E::SCHEMA;
        let values = normalize(schema, payload)?;

        let existing = fetch_row(&*self.executor, schema, id)
            .await?
            .ok_or_else(|| unknown_id(schema, id))?;

        let mut patch = build_patch(schema, &values)?;
        validate(schema, &values, Mode::Update { existing: &existing })?;

        for field in schema.unique_fields() {
            let Some(value) = values.get(field.name) else {
                continue;
            };
            if !value.same_as(&existing.value(field.column)) {
                check_unique(&*self.executor, schema, field, value, Some(id)).await?;
            }
        }

        patch.push(UPDATED_AT_COLUMN, SqlValue::DateTime(timestamp()));
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            schema.table,
            patch.assignments(),
            ID_COLUMN
        );
        let mut params = patch.values;
        params.push(SqlValue::Int(id));
        let changed = values.len();

        let updated: E = self
            .executor
            .transaction(move |scope| {
                Box::pin(async move {
                    scope
                        .execute(&sql, &params)
                        .await
                        .map_err(|fault| map_write_fault(schema, fault, &values))?;
                    read_back(scope, id).await
                })
            })
            .await?;

        info!(
            entity = schema.entity,
            id = updated.id(),
            fields = changed,
            "Updated {}",
            schema.entity.to_lowercase()
        );
        Ok(updated)
    }

    /// Delete according to the entity's delete mode
    ///
    /// Soft types flip their status to inactive and stay retrievable by id;
    /// hard types take the dependency-gated removal path.
    #[tracing::instrument(name = "delete", skip(self), fields(entity = E::SCHEMA.entity))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        match E::SCHEMA.delete_mode {
            DeleteMode::Soft => self.deactivate(id).await,
            DeleteMode::Hard => self.remove(id).await,
        }
    }

    pub async fn statistics(&self) -> Result<StatisticsReport> {
        aggregate(&*self.executor, E::SCHEMA).await
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        let schema = E::SCHEMA;
        if fetch_row(&*self.executor, schema, id).await?.is_none() {
            return Err(unknown_id(schema, id));
        }

        let sql = format!(
            "UPDATE {} SET {} = ?, {} = ? WHERE {} = ?",
            schema.table,
            schema.status_column(),
            UPDATED_AT_COLUMN,
            ID_COLUMN
        );
        self.executor
            .execute(
                &sql,
                &[
                    SqlValue::from(schema.status.inactive),
                    SqlValue::DateTime(timestamp()),
                    SqlValue::Int(id),
                ],
            )
            .await?;

        info!(entity = schema.entity, id, "Deactivated {}", schema.entity.to_lowercase());
        Ok(())
    }

    /// Existence check, dependency gate and removal in one transaction
    async fn remove(&self, id: i64) -> Result<()> {
        let schema = E::SCHEMA;

        self.executor
            .transaction(move |scope| {
                Box::pin(async move {
                    if fetch_row(scope, schema, id).await?.is_none() {
                        return Err(unknown_id(schema, id));
                    }

                    check_dependents(scope, schema, id).await?;

                    let sql = format!("DELETE FROM {} WHERE {} = ?", schema.table, ID_COLUMN);
                    if let Err(fault) = scope.execute(&sql, &[SqlValue::Int(id)]).await {
                        // A reference added after the count still blocks as a dependency
                        if fault.kind == FaultKind::ForeignKey {
                            check_dependents(scope, schema, id).await?;
                        }
                        return Err(fault.into());
                    }
                    Ok(())
                })
            })
            .await?;

        info!(entity = schema.entity, id, "Removed {}", schema.entity.to_lowercase());
        Ok(())
    }
}

impl<E: HardDelete> EntityRepository<E> {
    /// Physically remove the row once nothing references it
    #[tracing::instrument(name = "hard_delete", skip(self), fields(entity = E::SCHEMA.entity))]
    pub async fn hard_delete(&self, id: i64) -> Result<()> {
        self.remove(id).await
    }
}

async fn fetch_row<R>(runner: &R, schema: &EntitySchema, id: i64) -> Result<Option<Row>>
where
    R: StatementRunner + ?Sized,
{
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        schema.select_list(),
        schema.table,
        ID_COLUMN
    );
    let mut rows = runner.query(&sql, &[SqlValue::Int(id)]).await?;
    Ok(if rows.is_empty() {
        None
    } else {
        Some(rows.swap_remove(0))
    })
}

/// Fresh copy of a row just written, decoded as the entity
async fn read_back<E, R>(runner: &R, id: i64) -> Result<E>
where
    E: Entity,
    R: StatementRunner + ?Sized,
{
    let row = fetch_row(runner, E::SCHEMA, id).await?.ok_or_else(|| {
        StoreFault::new(
            FaultKind::Other,
            "ROW_NOT_FOUND_AFTER_WRITE",
            format!("{} {} could not be read back", E::SCHEMA.entity, id),
        )
    })?;
    Ok(E::from_row(&row)?)
}

fn unknown_id(schema: &EntitySchema, id: i64) -> AppError {
    AppError::validation(ID_COLUMN, format!("{} {} does not exist", schema.entity, id))
}

/// Store-level duplicate keys surface exactly like the pre-check's error
fn map_write_fault(schema: &EntitySchema, fault: StoreFault, values: &FieldValues) -> AppError {
    if !fault.is_duplicate_key() {
        return AppError::Database(fault);
    }

    let Some(field) = schema.unique_field_for_key(fault.key.as_deref()) else {
        return AppError::Database(fault);
    };

    warn!(
        entity = schema.entity,
        key = fault.key.as_deref().unwrap_or("unknown"),
        field = field.name,
        "Duplicate key reported by store after uniqueness check passed"
    );

    let value = values.get(field.name).cloned().unwrap_or(SqlValue::Null);
    duplicate_error(schema, field, &value)
}

/// Current UTC time at millisecond precision, as stored
fn timestamp() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(3)
}
