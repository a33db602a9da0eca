//! Validated entity-repository layer
//!
//! Leaves first: `schema` declares fields, `payload` normalizes caller input,
//! `validation`, `uniqueness`, `dependency`, `patch`, `filter` and
//! `statistics` each do one job over a schema, and `entity_repository`
//! composes them behind one generic type.

pub mod dependency;
pub mod entity_repository;
pub mod filter;
pub mod patch;
pub mod payload;
pub mod schema;
pub mod statistics;
pub mod uniqueness;
pub mod validation;

pub use entity_repository::EntityRepository;
pub use filter::ListFilter;
pub use patch::{build_patch, Patch};
pub use payload::{normalize, FieldValues, Payload};
pub use schema::{DeleteMode, EntitySchema, FieldDescriptor, FieldKind};
pub use statistics::StatisticsReport;
pub use validation::{validate, Mode};
