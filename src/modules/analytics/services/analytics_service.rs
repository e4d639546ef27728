use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{round_money, AppError, Result};
use crate::modules::analytics::models::{
    AnalyticsPeriod, AnalyticsTrend, FeeAnalytics, RevenueInsights,
};
use crate::modules::analytics::services::statistics::{self, TimeSeriesPoint};
use crate::modules::transactions::models::{FeeTransaction, FeeTransactionStatus};
use crate::modules::transactions::repositories::FeeTransactionRepository;

/// Longest period a single analytics request may span
pub const MAX_PERIOD_DAYS: i64 = 366;

const MOVING_AVERAGE_WINDOW: usize = 3;
const FORECAST_DAYS: usize = 7;
const ANOMALY_THRESHOLD: f64 = 2.0;

/// Aggregates applied fee transactions into revenue analytics
pub struct AnalyticsService {
    transaction_repo: Arc<dyn FeeTransactionRepository>,
}

impl AnalyticsService {
    pub fn new(transaction_repo: Arc<dyn FeeTransactionRepository>) -> Self {
        Self { transaction_repo }
    }

    /// Validate that a date range can be reported on
    pub fn validate_period(&self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        if start > end {
            return Err(AppError::validation(format!(
                "start_date ({}) must be before or equal to end_date ({})",
                start, end
            )));
        }

        let days = (end - start).num_days() + 1;
        if days > MAX_PERIOD_DAYS {
            return Err(AppError::validation(format!(
                "Date range too large: {} days (maximum {} days)",
                days, MAX_PERIOD_DAYS
            )));
        }

        Ok(())
    }

    /// Fee analytics for transactions processed between `start` and `end`
    /// (inclusive, UTC calendar days)
    pub async fn fee_analytics(&self, start: NaiveDate, end: NaiveDate) -> Result<FeeAnalytics> {
        self.validate_period(start, end)?;

        let (from, to) = period_bounds(start, end)?;
        let transactions = self.transaction_repo.list_between(from, to).await?;

        let analytics = aggregate(AnalyticsPeriod { start, end }, &transactions)?;

        if analytics.is_empty() {
            warn!(%start, %end, "Empty fee analytics generated");
        } else {
            info!(
                %start,
                %end,
                transactions = analytics.transaction_count,
                total_fees = %analytics.total_fees,
                "Fee analytics generated"
            );
        }

        Ok(analytics)
    }
}

fn period_bounds(start: NaiveDate, end: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let from = Utc.from_utc_datetime(&start.and_time(NaiveTime::default()));
    let to = Utc.from_utc_datetime(&end.and_time(NaiveTime::default()))
        .checked_add_signed(Duration::days(1) - Duration::nanoseconds(1))
        .ok_or_else(|| AppError::validation(format!("end_date {} is out of range", end)))?;
    Ok((from, to))
}

fn percent_of(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    round_money(
        Decimal::from(part as u64) / Decimal::from(whole as u64) * Decimal::ONE_HUNDRED,
        2,
    )
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn accumulate(total: &mut Decimal, amount: Decimal) -> Result<()> {
    *total = total
        .checked_add(amount)
        .ok_or_else(|| AppError::internal("Fee totals exceed the decimal range"))?;
    Ok(())
}

/// Build analytics from the transactions of a period
///
/// # Errors
/// * `Internal` if a money total leaves the decimal range
pub fn aggregate(
    period: AnalyticsPeriod,
    transactions: &[FeeTransaction],
) -> Result<FeeAnalytics> {
    let mut total_revenue = Decimal::ZERO;
    let mut total_fees = Decimal::ZERO;
    let mut total_commissions = Decimal::ZERO;
    let mut fees_by_type = BTreeMap::new();
    let mut commissions_by_type = BTreeMap::new();
    let mut revenue_by_user_tier = BTreeMap::new();
    let mut revenue_by_project_type = BTreeMap::new();
    let mut fee_percentage_sum = Decimal::ZERO;
    let mut transaction_values = Vec::new();

    let mut trends: BTreeMap<NaiveDate, AnalyticsTrend> = BTreeMap::new();
    for day in period.start.iter_days().take_while(|day| *day <= period.end) {
        trends.insert(day, AnalyticsTrend::empty(day));
    }

    let mut refunded = 0;
    let mut disputed = 0;

    for tx in transactions {
        match tx.status {
            FeeTransactionStatus::Refunded => {
                refunded += 1;
                continue;
            }
            FeeTransactionStatus::Disputed => disputed += 1,
            FeeTransactionStatus::Applied => {}
        }

        let calc = &tx.calculation;
        let mut fees = Decimal::ZERO;
        let mut commissions = Decimal::ZERO;

        for fee in &calc.fees {
            accumulate(&mut fees, fee.amount)?;
            accumulate(fees_by_type.entry(fee.fee_type).or_insert(Decimal::ZERO), fee.amount)?;
        }
        for commission in &calc.commissions {
            accumulate(&mut commissions, commission.amount)?;
            accumulate(
                commissions_by_type
                    .entry(commission.commission_type)
                    .or_insert(Decimal::ZERO),
                commission.amount,
            )?;
        }

        accumulate(&mut total_revenue, calc.total_amount)?;
        accumulate(&mut total_fees, fees)?;
        accumulate(&mut total_commissions, commissions)?;
        accumulate(
            revenue_by_user_tier
                .entry(calc.input.user_tier)
                .or_insert(Decimal::ZERO),
            calc.total_amount,
        )?;
        accumulate(
            revenue_by_project_type
                .entry(calc.input.project_type)
                .or_insert(Decimal::ZERO),
            calc.total_amount,
        )?;

        accumulate(&mut fee_percentage_sum, calc.breakdown.fee_percentage)?;
        transaction_values.push(to_f64(calc.total_amount));

        if let Some(trend) = trends.get_mut(&tx.processed_at.date_naive()) {
            accumulate(&mut trend.revenue, calc.total_amount)?;
            accumulate(&mut trend.fees, fees)?;
            accumulate(&mut trend.commissions, commissions)?;
            trend.transaction_count += 1;
        }
    }

    let average_fee_percentage = if transaction_values.is_empty() {
        Decimal::ZERO
    } else {
        round_money(
            fee_percentage_sum / Decimal::from(transaction_values.len() as u64),
            2,
        )
    };

    let trends: Vec<AnalyticsTrend> = trends.into_values().collect();
    let insights = revenue_insights(&trends, &transaction_values);

    Ok(FeeAnalytics {
        period,
        total_revenue,
        total_fees,
        total_commissions,
        fees_by_type,
        commissions_by_type,
        revenue_by_user_tier,
        revenue_by_project_type,
        average_fee_percentage,
        transaction_count: transactions.len(),
        refund_rate: percent_of(refunded, transactions.len()),
        dispute_rate: percent_of(disputed, transactions.len()),
        trends,
        insights,
    })
}

fn revenue_insights(trends: &[AnalyticsTrend], transaction_values: &[f64]) -> RevenueInsights {
    let series: Vec<TimeSeriesPoint> = trends
        .iter()
        .map(|t| TimeSeriesPoint::new(t.date, to_f64(t.revenue)))
        .collect();

    let half = series.len() / 2;
    let earlier: f64 = series[..half].iter().map(|p| p.value).sum();
    let later: f64 = series[half..].iter().map(|p| p.value).sum();

    RevenueInsights {
        median_transaction_value: statistics::percentile(transaction_values, 50.0),
        p95_transaction_value: statistics::percentile(transaction_values, 95.0),
        direction: statistics::trend_direction(later, earlier),
        change_percentage: statistics::change_percentage(later, earlier),
        moving_average: statistics::moving_average(&series, MOVING_AVERAGE_WINDOW),
        anomalies: statistics::detect_anomalies(&series, ANOMALY_THRESHOLD),
        forecast: statistics::forecast(&series, FORECAST_DAYS),
    }
}
