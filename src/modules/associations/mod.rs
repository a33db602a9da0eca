//! Planters' associations
//!
//! Soft-deleted on `delete`; `hard_delete` is refused while planters or
//! equipment still reference the association.

pub mod models;
pub mod schema;

pub use models::{Association, DuesFrequency};
pub use schema::ASSOCIATION_SCHEMA;

use actix_web::web;
use std::sync::Arc;

use crate::core::traits::QueryExecutor;
use crate::modules::crud_controller;
use crate::repository::EntityRepository;

pub type AssociationRepository = EntityRepository<Association>;

/// Configure association routes
pub fn configure(cfg: &mut web::ServiceConfig, executor: &Arc<dyn QueryExecutor>) {
    crud_controller::configure_with_hard_delete::<Association>(cfg, "/associations", executor);
}
