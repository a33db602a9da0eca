//! List filters
//!
//! A filter bag holds an optional status, equality filters on the fields a
//! schema declares filterable, and a free-text search. Nothing is excluded
//! implicitly: inactive rows are listed unless a status is asked for.

use serde_json::Value;
use std::collections::HashMap;

use super::payload::convert;
use super::schema::EntitySchema;
use super::validation::check_field;
use crate::core::{AppError, Result, SqlValue};

/// Escape character for LIKE patterns
const LIKE_ESCAPE: char = '!';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub status: Option<String>,
    pub equals: Vec<(String, Value)>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Equality on a declared filter field; `Value::Null` matches NULL
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push((field.into(), value.into()));
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build a filter from query-string parameters
    ///
    /// `status`, `search`, `limit` and `offset` are reserved; every other
    /// key becomes an equality filter and is checked against the schema
    /// when the query is built.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self> {
        let mut filter = ListFilter::new();
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        for key in keys {
            let value = &params[key];
            match key.as_str() {
                "status" => filter.status = Some(value.clone()),
                "search" => filter.search = Some(value.clone()),
                "limit" => filter.limit = Some(parse_count(key, value)?),
                "offset" => filter.offset = Some(parse_count(key, value)?),
                _ => filter.equals.push((key.clone(), Value::String(value.clone()))),
            }
        }

        Ok(filter)
    }

    /// `LIMIT`/`OFFSET` suffix; an offset alone still needs a limit
    pub fn page_clause(&self) -> String {
        match (self.limit, self.offset) {
            (None, None) => String::new(),
            (Some(limit), None) => format!(" LIMIT {}", limit),
            (limit, Some(offset)) => format!(
                " LIMIT {} OFFSET {}",
                limit.map_or(i64::MAX, i64::from),
                offset
            ),
        }
    }
}

fn parse_count(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::validation(key, format!("{} must be a non-negative integer", key)))
}

/// `" WHERE ..."` (or empty) and its parameters
pub fn build_where(schema: &EntitySchema, filter: &ListFilter) -> Result<(String, Vec<SqlValue>)> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<SqlValue> = Vec::new();

    if let Some(status) = &filter.status {
        let field = schema
            .status_field()
            .ok_or_else(|| AppError::configuration(format!("{} has no status field", schema.entity)))?;
        let value = convert(field, &Value::String(status.clone()))?;
        check_field(field, &value)?;
        if !value.is_null() {
            clauses.push(format!("{} = ?", field.column));
            params.push(value);
        }
    }

    for (name, raw) in &filter.equals {
        let field = schema
            .field(name)
            .filter(|field| schema.filters.contains(&field.name))
            .ok_or_else(|| {
                AppError::validation(
                    name.as_str(),
                    format!("{} cannot be filtered on '{}'", schema.entity, name),
                )
            })?;

        match convert(field, raw)? {
            SqlValue::Null => clauses.push(format!("{} IS NULL", field.column)),
            value => {
                clauses.push(format!("{} = ?", field.column));
                params.push(value);
            }
        }
    }

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let columns: Vec<String> = schema
            .search
            .iter()
            .filter_map(|name| schema.field(name))
            .map(|field| {
                params.push(SqlValue::Text(pattern.clone()));
                format!("LOWER({}) LIKE ? ESCAPE '{}'", field.column, LIKE_ESCAPE)
            })
            .collect();
        if !columns.is_empty() {
            clauses.push(format!("({})", columns.join(" OR ")));
        }
    }

    if clauses.is_empty() {
        return Ok((String::new(), params));
    }

    Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
