use serde::Serialize;

use crate::core::error::StoreFault;
use crate::core::value::Row;
use crate::repository::schema::EntitySchema;

/// A record type managed by [`EntityRepository`](crate::repository::EntityRepository)
///
/// The schema is a compile-time table; everything the repository does
/// (validation, uniqueness, patches, statistics) is driven from it.
pub trait Entity: Serialize + Send + Sync + Sized + 'static {
    const SCHEMA: &'static EntitySchema;

    /// Build the entity from a row selected with `SCHEMA.select_list()`
    fn from_row(row: &Row) -> Result<Self, StoreFault>;

    /// Store-assigned identifier
    fn id(&self) -> i64;
}

/// Entity types whose rows may be physically removed
///
/// Only these get `EntityRepository::hard_delete`.
pub trait HardDelete: Entity {}
