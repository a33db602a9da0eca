pub mod models;
pub mod schema;

pub use models::{Gender, Planter};
pub use schema::PLANTER_SCHEMA;

use actix_web::web;
use std::sync::Arc;

use crate::core::traits::QueryExecutor;
use crate::modules::crud_controller;
use crate::repository::EntityRepository;

pub type PlanterRepository = EntityRepository<Planter>;

/// Configure planter routes
pub fn configure(cfg: &mut web::ServiceConfig, executor: &Arc<dyn QueryExecutor>) {
    crud_controller::configure::<Planter>(cfg, "/planters", executor);
}
