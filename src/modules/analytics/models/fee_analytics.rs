use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::analytics::services::statistics::{Anomaly, TimeSeriesPoint, TrendDirection};
use crate::modules::fees::models::{CommissionType, FeeType, ProjectType, UserTier};

/// Inclusive reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Totals for one calendar day of the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsTrend {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub fees: Decimal,
    pub commissions: Decimal,
    pub transaction_count: usize,
}

impl AnalyticsTrend {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            revenue: Decimal::ZERO,
            fees: Decimal::ZERO,
            commissions: Decimal::ZERO,
            transaction_count: 0,
        }
    }
}

/// Statistical read of the daily revenue series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueInsights {
    pub median_transaction_value: f64,
    pub p95_transaction_value: f64,
    /// Second half of the period against the first
    pub direction: TrendDirection,
    pub change_percentage: f64,
    pub moving_average: Vec<TimeSeriesPoint>,
    pub anomalies: Vec<Anomaly>,
    pub forecast: Vec<TimeSeriesPoint>,
}

/// Fee revenue aggregated over a period
///
/// Money totals leave out refunded transactions; counts and rates cover
/// every transaction processed in the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeAnalytics {
    pub period: AnalyticsPeriod,
    pub total_revenue: Decimal,
    pub total_fees: Decimal,
    pub total_commissions: Decimal,
    pub fees_by_type: BTreeMap<FeeType, Decimal>,
    pub commissions_by_type: BTreeMap<CommissionType, Decimal>,
    pub revenue_by_user_tier: BTreeMap<UserTier, Decimal>,
    pub revenue_by_project_type: BTreeMap<ProjectType, Decimal>,
    pub average_fee_percentage: Decimal,
    pub transaction_count: usize,
    /// Percent of transactions refunded
    pub refund_rate: Decimal,
    /// Percent of transactions currently disputed
    pub dispute_rate: Decimal,
    pub trends: Vec<AnalyticsTrend>,
    pub insights: RevenueInsights,
}

impl FeeAnalytics {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}
