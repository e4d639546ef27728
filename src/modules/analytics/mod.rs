pub mod controllers;
pub mod models;
pub mod services;

pub use models::FeeAnalytics;
pub use services::AnalyticsService;
