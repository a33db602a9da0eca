//! Generic HTTP handlers over [`EntityRepository`]
//!
//! Every entity module mounts the same routes under its own scope; the
//! repository for the entity is registered as scope data.

use actix_web::{web, HttpResponse, Scope};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::core::traits::{Entity, HardDelete, QueryExecutor};
use crate::repository::{EntityRepository, ListFilter, Payload};

/// List entities
/// GET /{entity}?status=&search=&limit=&offset=&<filter>=
pub async fn list<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let filter = ListFilter::from_query(&query)?;
    let entities = repository.list(&filter).await?;

    Ok(HttpResponse::Ok().json(entities))
}

/// GET /{entity}/statistics
pub async fn statistics<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
) -> Result<HttpResponse, AppError> {
    let report = repository.statistics().await?;

    Ok(HttpResponse::Ok().json(report))
}

/// GET /{entity}/{id}
pub async fn get_by_id<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    match repository.get_by_id(id).await? {
        Some(entity) => Ok(HttpResponse::Ok().json(entity)),
        None => Ok(not_found(E::SCHEMA.entity)),
    }
}

/// GET /{entity}/by-key/{value}
pub async fn get_by_natural_key<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let value = path.into_inner();

    match repository.get_by_natural_key(&value).await? {
        Some(entity) => Ok(HttpResponse::Ok().json(entity)),
        None => Ok(not_found(E::SCHEMA.entity)),
    }
}

/// POST /{entity}
pub async fn create<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let payload = Payload::try_from(body.into_inner())?;
    let entity = repository.create(&payload).await?;

    Ok(HttpResponse::Created().json(entity))
}

/// PATCH /{entity}/{id}
pub async fn update<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let payload = Payload::try_from(body.into_inner())?;
    let entity = repository.update(path.into_inner(), &payload).await?;

    Ok(HttpResponse::Ok().json(entity))
}

/// DELETE /{entity}/{id}
pub async fn delete<E: Entity>(
    repository: web::Data<EntityRepository<E>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    repository.delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /{entity}/{id}/hard
pub async fn hard_delete<E: HardDelete>(
    repository: web::Data<EntityRepository<E>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    repository.hard_delete(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

fn not_found(entity: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": {
            "message": format!("{} not found", entity),
            "code": 404,
        }
    }))
}

fn routes<E: Entity>(path: &str, executor: &Arc<dyn QueryExecutor>) -> Scope {
    web::scope(path)
        .app_data(web::Data::new(EntityRepository::<E>::new(Arc::clone(executor))))
        .route("", web::get().to(list::<E>))
        .route("", web::post().to(create::<E>))
        .route("/statistics", web::get().to(statistics::<E>))
        .route("/by-key/{value}", web::get().to(get_by_natural_key::<E>))
        .route("/{id}", web::get().to(get_by_id::<E>))
        .route("/{id}", web::patch().to(update::<E>))
        .route("/{id}", web::delete().to(delete::<E>))
}

/// Mount the standard entity routes under `path`
pub fn configure<E: Entity>(
    cfg: &mut web::ServiceConfig,
    path: &str,
    executor: &Arc<dyn QueryExecutor>,
) {
    cfg.service(routes::<E>(path, executor));
}

/// Standard routes plus `DELETE {path}/{id}/hard`
pub fn configure_with_hard_delete<E: HardDelete>(
    cfg: &mut web::ServiceConfig,
    path: &str,
    executor: &Arc<dyn QueryExecutor>,
) {
    cfg.service(routes::<E>(path, executor).route("/{id}/hard", web::delete().to(hard_delete::<E>)));
}
