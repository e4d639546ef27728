use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::modules::fees::FeeCalculator;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Readiness check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub fee_schedule: bool,
    pub active_structures: usize,
}

/// GET /health - Liveness check
/// Returns 200 if the application can respond to requests
pub async fn health_check() -> impl Responder {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}

/// GET /ready - Readiness check
/// Ready once the fee schedule holds at least one active structure
pub async fn readiness_check(calculator: web::Data<Arc<FeeCalculator>>) -> impl Responder {
    let active_structures = calculator
        .structures()
        .iter()
        .filter(|s| s.is_active)
        .count();
    let ready = active_structures > 0;

    if !ready {
        tracing::error!("Readiness check failed: fee schedule has no active structures");
    }

    let response = ReadinessResponse {
        ready,
        checks: ReadinessChecks {
            fee_schedule: ready,
            active_structures,
        },
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
