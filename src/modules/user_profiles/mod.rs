pub mod models;
pub mod schema;

pub use models::{Role, UserProfile};
pub use schema::USER_PROFILE_SCHEMA;

use actix_web::web;
use std::sync::Arc;

use crate::core::traits::QueryExecutor;
use crate::modules::crud_controller;
use crate::repository::EntityRepository;

pub type UserProfileRepository = EntityRepository<UserProfile>;

/// Configure user profile routes
pub fn configure(cfg: &mut web::ServiceConfig, executor: &Arc<dyn QueryExecutor>) {
    crud_controller::configure::<UserProfile>(cfg, "/user-profiles", executor);
}
