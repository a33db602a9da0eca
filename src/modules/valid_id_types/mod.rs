//! Valid ID types
//!
//! Soft-deleted on `delete`, with `hard_delete` for entries created by
//! mistake.

pub mod models;
pub mod schema;

pub use models::{IdCategory, ValidIdType};
pub use schema::VALID_ID_TYPE_SCHEMA;

use actix_web::web;
use std::sync::Arc;

use crate::core::traits::QueryExecutor;
use crate::modules::crud_controller;
use crate::repository::EntityRepository;

pub type ValidIdTypeRepository = EntityRepository<ValidIdType>;

/// Configure valid ID type routes
pub fn configure(cfg: &mut web::ServiceConfig, executor: &Arc<dyn QueryExecutor>) {
    crud_controller::configure_with_hard_delete::<ValidIdType>(cfg, "/valid-id-types", executor);
}
