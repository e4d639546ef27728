/// Integration tests for fee analytics
///
/// Tests:
/// - totals exclude refunded transactions while rates count them
/// - one trend entry per day of the period
/// - period validation (ordering, maximum span, date format)
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use marketfee::analytics::AnalyticsService;
use marketfee::core::traits::Repository;
use marketfee::core::{AppError, Currency};
use marketfee::fees::models::{FeeType, ProjectType, UserTier};
use marketfee::fees::{FeeCalculationInput, FeeCalculator, FeeSchedule};
use marketfee::transactions::{
    FeeTransaction, FeeTransactionRepository, InMemoryTransactionRepository,
};
use marketfee::AppState;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

fn transaction(project_value: Decimal, project_type: ProjectType, on: NaiveDate) -> FeeTransaction {
    let at = Utc.from_utc_datetime(&on.and_hms_opt(14, 30, 0).unwrap());
    let input = FeeCalculationInput {
        project_value,
        project_type,
        user_tier: UserTier::Basic,
        user_id: "client-9".to_string(),
        project_id: format!("project-{}", on),
        currency: Currency::USD,
    };
    let calculation = FeeCalculator::default().calculate_at(&input, at).unwrap();
    FeeTransaction::applied(calculation, at)
}

async fn seeded_repository() -> Arc<InMemoryTransactionRepository> {
    let repo = Arc::new(InMemoryTransactionRepository::new());

    let mut refunded = transaction(dec!(8000), ProjectType::Hourly, day(2));
    refunded.refund("duplicate charge", Utc::now()).unwrap();

    for tx in [
        transaction(dec!(1000), ProjectType::Fixed, day(1)),
        refunded,
        transaction(dec!(3000), ProjectType::Fixed, day(3)),
        // Outside the queried period
        transaction(dec!(9999), ProjectType::Fixed, day(20)),
    ] {
        repo.create(tx).await.unwrap();
    }
    repo
}

#[tokio::test]
async fn test_fee_analytics_over_period() {
    let repo: Arc<dyn FeeTransactionRepository> = seeded_repository().await;
    let service = AnalyticsService::new(repo);

    let analytics = service.fee_analytics(day(1), day(7)).await.unwrap();

    assert_eq!(analytics.transaction_count, 3);
    assert_eq!(analytics.total_revenue, dec!(4000));
    assert_eq!(analytics.total_fees, dec!(200));
    assert_eq!(analytics.total_commissions, dec!(80));
    assert_eq!(analytics.fees_by_type[&FeeType::PlatformFee], dec!(200));
    assert_eq!(analytics.revenue_by_project_type[&ProjectType::Fixed], dec!(4000));
    assert_eq!(analytics.refund_rate, dec!(33.33));
    assert_eq!(analytics.dispute_rate, Decimal::ZERO);

    assert_eq!(analytics.trends.len(), 7);
    assert_eq!(analytics.trends[0].date, day(1));
    assert_eq!(analytics.trends[0].revenue, dec!(1000));
    assert_eq!(analytics.trends[1].transaction_count, 0);
    assert_eq!(analytics.trends[2].fees, dec!(150));
}

#[tokio::test]
async fn test_period_validation() {
    let repo: Arc<dyn FeeTransactionRepository> = Arc::new(InMemoryTransactionRepository::new());
    let service = AnalyticsService::new(repo);

    assert!(matches!(
        service.fee_analytics(day(5), day(1)).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        service
            .fee_analytics(day(1), day(1) + Duration::days(366))
            .await,
        Err(AppError::Validation(_))
    ));

    let single_day = service.fee_analytics(day(1), day(1)).await.unwrap();
    assert!(single_day.is_empty());
    assert_eq!(single_day.trends.len(), 1);
}

#[actix_web::test]
async fn test_fee_analytics_endpoint() {
    let repo: Arc<dyn FeeTransactionRepository> = seeded_repository().await;
    let state = AppState::with_repository(FeeSchedule::default(), repo);
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/analytics/fees?start_date=2025-09-01&end_date=2025-09-30")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["transaction_count"], 4);
    assert_eq!(body["trends"].as_array().unwrap().len(), 30);
    assert_eq!(body["period"]["start"], "2025-09-01");

    let req = test::TestRequest::get()
        .uri("/analytics/fees?start_date=09/01/2025&end_date=2025-09-30")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/analytics/fees?start_date=2025-09-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_fee_analytics_at_last_calendar_day() {
    let state = AppState::new(FeeSchedule::default());
    let app = test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/analytics/fees?start_date=%2B262142-12-31&end_date=%2B262142-12-31")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["transaction_count"], 0);
    assert_eq!(body["trends"].as_array().unwrap().len(), 1);
    assert!(body["insights"]["forecast"].as_array().unwrap().is_empty());
}
