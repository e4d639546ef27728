/// Integration tests for the fee transaction lifecycle
///
/// Tests:
/// - applying fees records a transaction (201)
/// - commission payout respects the recipient minimum
/// - dispute then refund, and the transitions that are refused
/// - listing with limit/offset and unknown ids
use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};

use marketfee::fees::FeeSchedule;
use marketfee::AppState;

macro_rules! app {
    () => {{
        let state = AppState::new(FeeSchedule::default());
        test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
    }};
}

/// Apply fees for a basic-tier project and return the transaction body
macro_rules! apply {
    ($app:expr, $value:expr) => {{
        let req = test::TestRequest::post()
            .uri("/transactions")
            .set_json(project($value))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

macro_rules! post {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::post().uri(&$uri).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri(&$uri)
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn project(project_value: u64) -> Value {
    json!({
        "project_value": project_value,
        "project_type": "milestone",
        "user_tier": "basic",
        "user_id": "freelancer-1",
        "project_id": "project-1",
        "currency": "EUR"
    })
}

#[actix_web::test]
async fn test_apply_and_fetch_transaction() {
    let app = app!();
    let tx = apply!(app, 4000);

    assert_eq!(tx["status"], "applied");
    assert_eq!(tx["project_id"], "project-1");
    assert_eq!(tx["calculation"]["input"]["currency"], "EUR");
    assert_eq!(
        tx["calculation"]["commissions"][0]["recipient"]["payment_preferences"]["currency"],
        "EUR"
    );

    let id = tx["id"].as_str().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/transactions/{}", id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["id"], tx["id"]);
}

#[actix_web::test]
async fn test_commission_payout_threshold() {
    let app = app!();

    // 2% of 1000 = 20, below the 50 minimum
    let small = apply!(app, 1000);
    let uri = format!("/transactions/{}/commissions/process", small["id"].as_str().unwrap());
    let (status, body) = post!(app, uri);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculation"]["commissions"][0]["status"], "pending");

    // 2% of 5000 = 100
    let large = apply!(app, 5000);
    let uri = format!("/transactions/{}/commissions/process", large["id"].as_str().unwrap());
    let (status, body) = post!(app, uri);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculation"]["commissions"][0]["status"], "applied");
}

#[actix_web::test]
async fn test_dispute_then_refund() {
    let app = app!();
    let tx = apply!(app, 3000);
    let id = tx["id"].as_str().unwrap();

    let (status, body) = post!(
        app,
        format!("/transactions/{}/dispute", id),
        json!({ "reason": "work not delivered" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "disputed");
    assert_eq!(body["status_reason"], "work not delivered");

    // Disputed transactions cannot pay out commissions
    let (status, body) = post!(app, format!("/transactions/{}/commissions/process", id));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    let (status, body) = post!(
        app,
        format!("/transactions/{}/refund", id),
        json!({ "reason": "dispute upheld" })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "refunded");
    assert_eq!(body["calculation"]["fees"][0]["applied"], false);
    assert_eq!(body["calculation"]["commissions"][0]["status"], "refunded");

    let (status, _) = post!(
        app,
        format!("/transactions/{}/refund", id),
        json!({ "reason": "again" })
    );
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post!(
        app,
        format!("/transactions/{}/dispute", id),
        json!({ "reason": "again" })
    );
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_blank_reason_rejected() {
    let app = app!();
    let tx = apply!(app, 3000);

    let (status, body) = post!(
        app,
        format!("/transactions/{}/refund", tx["id"].as_str().unwrap()),
        json!({ "reason": "   " })
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_list_and_not_found() {
    let app = app!();
    for value in [1000, 2000, 3000] {
        apply!(app, value);
    }

    let req = test::TestRequest::get()
        .uri("/transactions?limit=2")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/transactions?limit=10&offset=2")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/transactions?limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/transactions/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/transactions/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
