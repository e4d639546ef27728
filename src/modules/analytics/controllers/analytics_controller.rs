use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::analytics::services::AnalyticsService;

/// Query parameters for the fee analytics endpoint
#[derive(Debug, Deserialize)]
pub struct FeeAnalyticsQuery {
    /// Start of the period (inclusive, format: YYYY-MM-DD)
    pub start_date: String,
    /// End of the period (inclusive, format: YYYY-MM-DD)
    pub end_date: String,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DD",
            field, value
        ))
    })
}

/// GET /analytics/fees
pub async fn get_fee_analytics(
    service: web::Data<Arc<AnalyticsService>>,
    query: web::Query<FeeAnalyticsQuery>,
) -> Result<HttpResponse, AppError> {
    let start = parse_date("start_date", &query.start_date)?;
    let end = parse_date("end_date", &query.end_date)?;

    let analytics = service.fee_analytics(start, end).await?;

    Ok(HttpResponse::Ok().json(analytics))
}

/// Configure routes for the analytics module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/analytics").route("/fees", web::get().to(get_fee_analytics)));
}
