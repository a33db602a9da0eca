//! Sugar mills
//!
//! Mills are removed outright on `delete`.

pub mod models;
pub mod schema;

pub use models::{OperatingStatus, SugarMill};
pub use schema::SUGAR_MILL_SCHEMA;

use actix_web::web;
use std::sync::Arc;

use crate::core::traits::QueryExecutor;
use crate::modules::crud_controller;
use crate::repository::EntityRepository;

pub type SugarMillRepository = EntityRepository<SugarMill>;

/// Configure sugar mill routes
pub fn configure(cfg: &mut web::ServiceConfig, executor: &Arc<dyn QueryExecutor>) {
    crud_controller::configure_with_hard_delete::<SugarMill>(cfg, "/sugar-mills", executor);
}
