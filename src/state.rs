use std::sync::Arc;

use actix_web::web;

use crate::middleware::{json_error_handler, path_error_handler, query_error_handler};
use crate::modules::analytics::{self, AnalyticsService};
use crate::modules::fees::{self, FeeCalculator, FeeSchedule};
use crate::modules::health;
use crate::modules::transactions::{
    self, FeeTransactionRepository, FeeTransactionService, InMemoryTransactionRepository,
};

/// Services shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<FeeCalculator>,
    pub transactions: Arc<FeeTransactionService>,
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    /// Wire services around a schedule, backed by the in-memory transaction store
    pub fn new(schedule: FeeSchedule) -> Self {
        let repository: Arc<dyn FeeTransactionRepository> =
            Arc::new(InMemoryTransactionRepository::new());
        Self::with_repository(schedule, repository)
    }

    pub fn with_repository(
        schedule: FeeSchedule,
        repository: Arc<dyn FeeTransactionRepository>,
    ) -> Self {
        let calculator = Arc::new(FeeCalculator::new(schedule));
        let transactions = Arc::new(FeeTransactionService::new(
            calculator.clone(),
            repository.clone(),
        ));
        let analytics = Arc::new(AnalyticsService::new(repository));

        Self {
            calculator,
            transactions,
            analytics,
        }
    }

    /// Register shared data, extractor error handlers and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.calculator.clone()))
            .app_data(web::Data::new(self.transactions.clone()))
            .app_data(web::Data::new(self.analytics.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .configure(health::controllers::configure)
            .configure(fees::controllers::configure)
            .configure(transactions::controllers::configure)
            .configure(analytics::controllers::configure);
    }
}
