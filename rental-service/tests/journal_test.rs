//! Monthly cash journal, expenses and dashboard.

mod common;

use axum::http::StatusCode;
use common::{money, TestApp, TEST_USER};
use rust_decimal::Decimal;
use serde_json::json;

/// One vehicle at 5000/day with a January 2024 of rentals and expenses.
async fn january(app: &TestApp) -> (String, String) {
    app.seed_active(TEST_USER).await;
    let vehicle_id = app.create_vehicle(TEST_USER, 5000).await;
    let customer_id = app.create_customer(TEST_USER).await;

    let rental = |start: &str, end: &str, extra: serde_json::Value| {
        let mut body = json!({
            "vehicle_id": vehicle_id,
            "customer_id": customer_id,
            "start_date": start,
            "end_date": end
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            body.extend(extra.clone());
        }
        body
    };

    // 15000, fully paid
    let paid = app
        .create_rental(
            TEST_USER,
            rental("2024-01-01", "2024-01-04", json!({"payment_status": "paid"})),
        )
        .await;
    // 5000 + 2000 fees, 3000 paid
    app.create_rental(
        TEST_USER,
        rental(
            "2024-01-10",
            "2024-01-10",
            json!({
                "payment_status": "partial",
                "paid_amount": 3000,
                "additional_fees": {"description": "Cleaning", "amount": 2000}
            }),
        ),
    )
    .await;
    // Cancelled rentals stay out of the journal.
    let cancelled = app
        .create_rental(
            TEST_USER,
            rental("2024-01-15", "2024-01-16", json!({"payment_status": "paid"})),
        )
        .await;
    let (status, _) = app
        .put(
            &format!("/rentals/{}/status", cancelled["id"].as_str().unwrap()),
            TEST_USER,
            json!({"status": "cancelled"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    // Next month.
    app.create_rental(
        TEST_USER,
        rental("2024-02-01", "2024-02-02", json!({"payment_status": "paid"})),
    )
    .await;

    let (status, _) = app
        .post(
            "/expenses/vehicle",
            TEST_USER,
            json!({"car_id": vehicle_id, "amount": 1000, "date": "2024-01-10", "designation": "Oil change"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post(
            "/expenses/business",
            TEST_USER,
            json!({"amount": 500, "date": "2024-01-20", "name": "Office rent"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    (vehicle_id, paid["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn journal_merges_entries_newest_first() {
    let app = TestApp::new();
    let (_, paid_id) = january(&app).await;

    let (status, journal) = app.get("/journal?year=2024&month=1", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);

    let entries = journal["entries"].as_array().unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| e["kind"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec!["business_expense", "rental", "vehicle_expense", "rental"]
    );
    assert_eq!(entries[0]["designation"], "Office rent");
    assert_eq!(entries[3]["source_id"], paid_id.as_str());
    assert!(entries[3]["designation"]
        .as_str()
        .unwrap()
        .ends_with("- Amina Benali"));

    assert_eq!(money(&entries[1]["revenue"]), Decimal::from(3000));
    assert_eq!(money(&entries[1]["remaining_amount"]), Decimal::from(4000));

    let totals = &journal["totals"];
    assert_eq!(money(&totals["revenue_total"]), Decimal::from(18000));
    assert_eq!(money(&totals["expense_total"]), Decimal::from(1500));
    assert_eq!(money(&totals["pending_total"]), Decimal::from(4000));
    assert_eq!(money(&totals["net_cash"]), Decimal::from(16500));
}

#[tokio::test]
async fn empty_month_has_zero_totals() {
    let app = TestApp::new();
    let (status, journal) = app.get("/journal?year=2023&month=6", TEST_USER).await;

    assert_eq!(status, StatusCode::OK);
    assert!(journal["entries"].as_array().unwrap().is_empty());
    assert_eq!(money(&journal["totals"]["net_cash"]), Decimal::ZERO);
}

#[tokio::test]
async fn invalid_month_is_rejected() {
    let app = TestApp::new();
    let (status, _) = app.get("/journal?year=2024&month=13", TEST_USER).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/journal?year=10000&month=1", TEST_USER).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/rentals?year=0&month=6", TEST_USER).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_reports_growth_from_empty_month() {
    let app = TestApp::new();
    january(&app).await;

    let (status, dashboard) = app.get("/dashboard?year=2024&month=1", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&dashboard["revenue"]), Decimal::from(18000));
    assert_eq!(money(&dashboard["previous_revenue"]), Decimal::ZERO);
    assert_eq!(money(&dashboard["revenue_growth_percentage"]), Decimal::from(100));
    assert_eq!(money(&dashboard["net_cash"]), Decimal::from(16500));
    assert_eq!(dashboard["fleet_size"], 1);
    assert_eq!(dashboard["rented_vehicles"], 0);
    assert_eq!(money(&dashboard["utilization_percentage"]), Decimal::ZERO);

    // February earned 5000 against January's 18000.
    let (_, dashboard) = app.get("/dashboard?year=2024&month=2", TEST_USER).await;
    assert_eq!(money(&dashboard["revenue"]), Decimal::from(5000));
    assert_eq!(
        money(&dashboard["revenue_growth_percentage"]),
        "-72.22".parse::<Decimal>().unwrap()
    );
}

#[tokio::test]
async fn vehicle_expense_requires_known_vehicle() {
    let app = TestApp::new();
    app.seed_active(TEST_USER).await;

    let (status, _) = app
        .post(
            "/expenses/vehicle",
            TEST_USER,
            json!({"amount": 100, "date": "2024-01-10", "designation": "Tyres"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/expenses/vehicle",
            TEST_USER,
            json!({"car_id": "ghost", "amount": 100, "date": "2024-01-10", "designation": "Tyres"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/expenses/business",
            TEST_USER,
            json!({"amount": -5, "date": "2024-01-10", "designation": "Refund"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expenses_can_be_listed_and_deleted() {
    let app = TestApp::new();
    january(&app).await;

    let (status, body) = app.get("/expenses?year=2024&month=1", TEST_USER).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["scope"], "vehicle");

    let (_, body) = app.get("/expenses?scope=business", TEST_USER).await;
    let business = body.as_array().unwrap();
    assert_eq!(business.len(), 1);
    let id = business[0]["id"].as_str().unwrap();

    let (status, _) = app.delete(&format!("/expenses/business/{}", id), TEST_USER).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.delete(&format!("/expenses/business/{}", id), TEST_USER).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/expenses?scope=travel", TEST_USER).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
