use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::fees::models::{FeeCalculationInput, UserTier};
use crate::modules::fees::services::FeeCalculator;

/// Calculate fees for a project
/// POST /fees/calculate
pub async fn calculate_fees(
    calculator: web::Data<Arc<FeeCalculator>>,
    request: web::Json<FeeCalculationInput>,
) -> Result<HttpResponse, AppError> {
    let result = calculator.calculate(&request)?;

    Ok(HttpResponse::Ok().json(result))
}

/// List configured fee structures
/// GET /fees/structures
pub async fn list_structures(
    calculator: web::Data<Arc<FeeCalculator>>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "structures": calculator.structures(),
    })))
}

/// Active structure for a tier
/// GET /fees/structures/{tier}
pub async fn get_structure_for_tier(
    calculator: web::Data<Arc<FeeCalculator>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let tier: UserTier = path.parse().map_err(AppError::Validation)?;
    let structure = calculator.structure_for_tier(tier)?;

    Ok(HttpResponse::Ok().json(structure))
}

/// Configure fee routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fees")
            .route("/calculate", web::post().to(calculate_fees))
            .route("/structures", web::get().to(list_structures))
            .route("/structures/{tier}", web::get().to(get_structure_for_tier)),
    );
}
