pub mod fee_analytics;

pub use fee_analytics::{AnalyticsPeriod, AnalyticsTrend, FeeAnalytics, RevenueInsights};
