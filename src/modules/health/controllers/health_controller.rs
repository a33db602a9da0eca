use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::traits::QueryExecutor;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: String,
    pub application: String,
}

/// GET /health - round trip to the store
/// Returns 503 when the store cannot be reached
pub async fn health_check(executor: web::Data<Arc<dyn QueryExecutor>>) -> impl Responder {
    let database = match executor.ping().await {
        Ok(()) => "healthy".to_string(),
        Err(fault) => {
            tracing::error!("Database health check failed: {}", fault);
            "unreachable".to_string()
        }
    };
    let healthy = database == "healthy";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: HealthChecks {
            database,
            application: "healthy".to_string(),
        },
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
