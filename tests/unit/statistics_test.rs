use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use marketfee::analytics::services::statistics::{
    correlation, detect_anomalies, forecast, mean, moving_average, percentile,
    standard_deviation, trend_direction, TimeSeriesPoint, TrendDirection,
};

fn series(values: &[f64]) -> Vec<TimeSeriesPoint> {
    let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| TimeSeriesPoint::new(start + Duration::days(i as i64), *v))
        .collect()
}

#[cfg(test)]
mod statistics_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_percentile_is_a_sample(
            values in prop::collection::vec(0.0f64..1_000_000.0, 1..50),
            pct in 0.0f64..100.0,
        ) {
            let p = percentile(&values, pct);
            prop_assert!(values.contains(&p));
        }

        #[test]
        fn test_mean_within_range(
            values in prop::collection::vec(-1_000.0f64..1_000.0, 1..50),
        ) {
            let m = mean(&values);
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= min - 1e-9 && m <= max + 1e-9);
            prop_assert!(standard_deviation(&values) >= 0.0);
        }

        #[test]
        fn test_correlation_bounded(
            pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..30),
        ) {
            let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let r = correlation(&xs, &ys);
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&r));
        }

        #[test]
        fn test_forecast_length_and_sign(
            values in prop::collection::vec(0.0f64..10_000.0, 3..40),
            periods in 1usize..30,
        ) {
            let data = series(&values);
            let projected = forecast(&data, periods);
            prop_assert_eq!(projected.len(), periods);
            prop_assert!(projected.iter().all(|p| p.value >= 0.0));
            prop_assert!(projected[0].date > data[data.len() - 1].date);
        }

        #[test]
        fn test_moving_average_preserves_dates(
            values in prop::collection::vec(0.0f64..1_000.0, 1..40),
            window in 1usize..10,
        ) {
            let data = series(&values);
            let averaged = moving_average(&data, window);
            prop_assert_eq!(averaged.len(), data.len());
            for (a, d) in averaged.iter().zip(&data) {
                prop_assert_eq!(a.date, d.date);
            }
        }
    }

    #[test]
    fn test_trend_direction_band() {
        assert_eq!(trend_direction(104.9, 100.0), TrendDirection::Stable);
        assert_eq!(trend_direction(105.0, 100.0), TrendDirection::Up);
        assert_eq!(trend_direction(95.0, 100.0), TrendDirection::Down);
        assert_eq!(trend_direction(1.0, 0.0), TrendDirection::Up);
    }

    #[test]
    fn test_spike_detected_once() {
        let mut values = vec![100.0; 30];
        values[12] = 1_000.0;
        let anomalies = detect_anomalies(&series(&values), 2.0);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].index, 12);
        assert_eq!(anomalies[0].value, 1_000.0);
    }
}
