use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::modules::fees::models::FeeCalculationInput;
use crate::modules::transactions::services::FeeTransactionService;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

/// Body for refund and dispute requests
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

/// Calculate and apply fees for a project
/// POST /transactions
pub async fn apply_fees(
    service: web::Data<Arc<FeeTransactionService>>,
    request: web::Json<FeeCalculationInput>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.calculate_and_apply(&request).await?;

    Ok(HttpResponse::Created().json(transaction))
}

/// GET /transactions
pub async fn list_transactions(
    service: web::Data<Arc<FeeTransactionService>>,
    query: web::Query<ListTransactionsQuery>,
) -> Result<HttpResponse, AppError> {
    let transactions = service.list_transactions(query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(transactions))
}

/// GET /transactions/{id}
pub async fn get_transaction(
    service: web::Data<Arc<FeeTransactionService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.get_transaction(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(transaction))
}

/// POST /transactions/{id}/commissions/process
pub async fn process_commissions(
    service: web::Data<Arc<FeeTransactionService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let transaction = service.process_commissions(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(transaction))
}

/// POST /transactions/{id}/refund
pub async fn refund_fees(
    service: web::Data<Arc<FeeTransactionService>>,
    path: web::Path<Uuid>,
    body: web::Json<ReasonRequest>,
) -> Result<HttpResponse, AppError> {
    let transaction = service
        .refund_fees(path.into_inner(), &body.reason)
        .await?;

    Ok(HttpResponse::Ok().json(transaction))
}

/// POST /transactions/{id}/dispute
pub async fn dispute_fees(
    service: web::Data<Arc<FeeTransactionService>>,
    path: web::Path<Uuid>,
    body: web::Json<ReasonRequest>,
) -> Result<HttpResponse, AppError> {
    let transaction = service
        .dispute_fees(path.into_inner(), &body.reason)
        .await?;

    Ok(HttpResponse::Ok().json(transaction))
}

/// Configure transaction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .route("", web::post().to(apply_fees))
            .route("", web::get().to(list_transactions))
            .route("/{id}", web::get().to(get_transaction))
            .route("/{id}/commissions/process", web::post().to(process_commissions))
            .route("/{id}/refund", web::post().to(refund_fees))
            .route("/{id}/dispute", web::post().to(dispute_fees)),
    );
}
