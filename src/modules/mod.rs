pub mod associations;
pub mod crud_controller;
pub mod health;
pub mod planters;
pub mod sugar_mills;
pub mod user_profiles;
pub mod valid_id_types;

use actix_web::web;
use std::sync::Arc;

use crate::core::traits::QueryExecutor;

/// Mount every entity under `/api`
pub fn configure_api(cfg: &mut web::ServiceConfig, executor: &Arc<dyn QueryExecutor>) {
    cfg.service(web::scope("/api").configure(|api| {
        associations::configure(api, executor);
        planters::configure(api, executor);
        sugar_mills::configure(api, executor);
        user_profiles::configure(api, executor);
        valid_id_types::configure(api, executor);
    }));
}
