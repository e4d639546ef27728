//! Numeric helpers for time-series analytics.
//!
//! Everything here is pure and works on `f64`; money is converted from
//! `Decimal` at the edge by the analytics service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Relative change below which a series counts as flat
pub const STABLE_THRESHOLD: f64 = 0.05;

/// Smoothing factor for forecasts
pub const SMOOTHING_ALPHA: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub index: usize,
    pub date: NaiveDate,
    pub value: f64,
    pub z_score: f64,
    pub severity: AnomalySeverity,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Nearest-rank percentile; 0 for an empty slice
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// Percentage change from `previous` to `current`, to two decimals
pub fn change_percentage(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round2((current - previous) / previous * 100.0)
}

pub fn trend_direction(current: f64, previous: f64) -> TrendDirection {
    let changed = if previous == 0.0 {
        current != 0.0
    } else {
        ((current - previous) / previous).abs() >= STABLE_THRESHOLD
    };

    if !changed {
        TrendDirection::Stable
    } else if current > previous {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    }
}

/// Trailing moving average; early points average over what is available
pub fn moving_average(data: &[TimeSeriesPoint], window: usize) -> Vec<TimeSeriesPoint> {
    let window = window.max(1);
    data.iter()
        .enumerate()
        .map(|(i, point)| {
            let start = (i + 1).saturating_sub(window);
            let slice: Vec<f64> = data[start..=i].iter().map(|p| p.value).collect();
            TimeSeriesPoint::new(point.date, round2(mean(&slice)))
        })
        .collect()
}

/// Pearson correlation; 0 when lengths differ or a series is constant
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_xx: f64 = xs.iter().map(|x| x * x).sum();
    let sum_yy: f64 = ys.iter().map(|y| y * y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_xx - sum_x * sum_x) * (n * sum_yy - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || denominator.is_nan() {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if lag == 0 || lag >= values.len() {
        return 0.0;
    }
    let mean = mean(values);
    let numerator: f64 = (0..values.len() - lag)
        .map(|i| (values[i] - mean) * (values[i + lag] - mean))
        .sum();
    let denominator: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Exponential smoothing plus a linear trend, one point per following day
///
/// Needs at least three observations. Values never go below zero. Stops
/// early at the end of the calendar.
pub fn forecast(data: &[TimeSeriesPoint], periods: usize) -> Vec<TimeSeriesPoint> {
    let (first, last) = match (data.first(), data.last()) {
        (Some(first), Some(last)) if data.len() >= 3 => (first, last),
        _ => return Vec::new(),
    };

    let smoothed = data[1..].iter().fold(first.value, |acc, p| {
        SMOOTHING_ALPHA * p.value + (1.0 - SMOOTHING_ALPHA) * acc
    });
    let trend = (last.value - first.value) / data.len() as f64;

    last.date
        .iter_days()
        .skip(1)
        .take(periods)
        .enumerate()
        .map(|(i, date)| {
            let value = (smoothed + trend * (i + 1) as f64).max(0.0);
            TimeSeriesPoint::new(date, round2(value))
        })
        .collect()
}

/// Points whose z-score exceeds `threshold`
///
/// Severity is high beyond twice the threshold, medium beyond one and a
/// half times, low otherwise.
pub fn detect_anomalies(data: &[TimeSeriesPoint], threshold: f64) -> Vec<Anomaly> {
    if data.len() < 3 {
        return Vec::new();
    }
    let values: Vec<f64> = data.iter().map(|p| p.value).collect();
    let mean = mean(&values);
    let std = standard_deviation(&values);
    if std == 0.0 {
        return Vec::new();
    }

    data.iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let z_score = ((point.value - mean) / std).abs();
            if z_score <= threshold {
                return None;
            }
            let severity = if z_score > threshold * 2.0 {
                AnomalySeverity::High
            } else if z_score > threshold * 1.5 {
                AnomalySeverity::Medium
            } else {
                AnomalySeverity::Low
            };
            Some(Anomaly {
                index,
                date: point.date,
                value: point.value,
                z_score: round2(z_score),
                severity,
            })
        })
        .collect()
}
