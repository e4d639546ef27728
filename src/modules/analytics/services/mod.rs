pub mod analytics_service;
pub mod statistics;

pub use analytics_service::AnalyticsService;
