//! Transaction, Stats and History Integration Tests
//!
//! Requires `DATABASE_URL`; skipped otherwise.

use axum::{http::StatusCode, Router};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

mod common;

use common::{new_user, send, test_app};

fn amount(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .unwrap()
}

async fn create_category(app: &Router, user: &str, name: &str, icon: &str, kind: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/api/categories",
        Some(user),
        Some(json!({"name": name, "icon": icon, "type": kind})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_transaction(
    app: &Router,
    user: &str,
    value: &str,
    date: &str,
    kind: &str,
    category: &str,
) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/transactions",
        Some(user),
        Some(json!({
            "amount": value,
            "date": date,
            "description": "test",
            "type": kind,
            "category": category,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn year_history(app: &Router, user: &str, year: i32) -> Vec<Value> {
    let (status, body) = send(
        app,
        "GET",
        &format!("/api/history-data?timeframe=year&year={year}"),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

async fn month_history(app: &Router, user: &str, year: i32, month: u32) -> Vec<Value> {
    let (status, body) = send(
        app,
        "GET",
        &format!("/api/history-data?timeframe=month&year={year}&month={month}"),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_transaction_snapshots_category() {
    let Some(pool) = common::setup_test_db().await else {
        return;
    };
    let app = test_app(pool);
    let user = new_user();

    create_category(&app, &user, "Food", "🍔", "expense").await;

    let transaction =
        create_transaction(&app, &user, "12.50", "2023-06-15T12:00:00.000Z", "expense", "Food").await;
    assert_eq!(transaction["category"], "Food");
    assert_eq!(transaction["categoryIcon"], "🍔");
    assert_eq!(transaction["type"], "expense");
    assert_eq!(amount(&transaction["amount"]), dec!(12.50));

    // Category type must match
    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&user),
        Some(json!({"amount": "5", "date": "2023-06-15", "type": "income", "category": "Food"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "category_not_found");

    // Deleting the category leaves the transaction alone
    let (status, _) = send(&app, "DELETE", "/api/categories/Food%7Cexpense", Some(&user), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, list) = send(
        &app,
        "GET",
        "/api/transactions?from=2023-06-01&to=2023-06-30",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["categoryIcon"], "🍔");
}

#[tokio::test]
async fn test_history_follows_create_and_delete() {
    let Some(pool) = common::setup_test_db().await else {
        return;
    };
    let app = test_app(pool);
    let user = new_user();

    create_category(&app, &user, "Salary", "💰", "income").await;
    create_category(&app, &user, "Rent", "🏠", "expense").await;

    let salary =
        create_transaction(&app, &user, "1000", "2023-06-15T09:00:00Z", "income", "Salary").await;
    create_transaction(&app, &user, "400.25", "2023-06-15T18:00:00Z", "expense", "Rent").await;
    create_transaction(&app, &user, "400.25", "2023-07-01T00:00:00Z", "expense", "Rent").await;

    let year = year_history(&app, &user, 2023).await;
    assert_eq!(year.len(), 12);
    assert_eq!(year[5]["month"], 6);
    assert_eq!(amount(&year[5]["income"]), dec!(1000));
    assert_eq!(amount(&year[5]["expense"]), dec!(400.25));
    assert_eq!(amount(&year[6]["expense"]), dec!(400.25));
    assert_eq!(amount(&year[0]["income"]), Decimal::ZERO);

    let june = month_history(&app, &user, 2023, 6).await;
    assert_eq!(june.len(), 30);
    assert_eq!(june[14]["day"], 15);
    assert_eq!(amount(&june[14]["income"]), dec!(1000));
    assert_eq!(amount(&june[14]["expense"]), dec!(400.25));
    assert_eq!(amount(&june[15]["income"]), Decimal::ZERO);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/transactions/{}", salary["id"].as_str().unwrap()),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let year = year_history(&app, &user, 2023).await;
    assert_eq!(amount(&year[5]["income"]), Decimal::ZERO);
    assert_eq!(amount(&year[5]["expense"]), dec!(400.25));

    let june = month_history(&app, &user, 2023, 6).await;
    assert_eq!(amount(&june[14]["income"]), Decimal::ZERO);
    assert_eq!(amount(&june[14]["expense"]), dec!(400.25));

    let (status, periods) = send(&app, "GET", "/api/history-periods", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(periods, json!([2023]));
}

#[tokio::test]
async fn test_largest_amount_is_stored() {
    let Some(pool) = common::setup_test_db().await else {
        return;
    };
    let app = test_app(pool);
    let user = new_user();

    create_category(&app, &user, "Windfall", "🎰", "income").await;

    for _ in 0..2 {
        let transaction = create_transaction(
            &app,
            &user,
            "1000000000000",
            "2022-12-31T12:00:00Z",
            "income",
            "Windfall",
        )
        .await;
        assert_eq!(amount(&transaction["amount"]), dec!(1000000000000));
    }

    // Two maximum amounts on one day still fit the history columns
    let year = year_history(&app, &user, 2022).await;
    assert_eq!(amount(&year[11]["income"]), dec!(2000000000000));

    let december = month_history(&app, &user, 2022, 12).await;
    assert_eq!(amount(&december[30]["income"]), dec!(2000000000000));

    // One cent more is rejected before it reaches the database
    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(&user),
        Some(json!({
            "amount": "1000000000000.01",
            "date": "2022-12-31",
            "type": "income",
            "category": "Windfall",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn test_delete_transaction_ownership() {
    let Some(pool) = common::setup_test_db().await else {
        return;
    };
    let app = test_app(pool);
    let owner = new_user();
    let intruder = new_user();

    create_category(&app, &owner, "Travel", "✈️", "expense").await;
    let transaction =
        create_transaction(&app, &owner, "99.99", "2023-03-10", "expense", "Travel").await;
    let uri = format!("/api/transactions/{}", transaction["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_code"], "forbidden");

    // History is untouched by the rejected delete
    let year = year_history(&app, &owner, 2023).await;
    assert_eq!(amount(&year[2]["expense"]), dec!(99.99));

    let (status, _) = send(&app, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "transaction_not_found");
}

#[tokio::test]
async fn test_stats_over_range() {
    let Some(pool) = common::setup_test_db().await else {
        return;
    };
    let app = test_app(pool);
    let user = new_user();

    create_category(&app, &user, "Salary", "💰", "income").await;
    create_category(&app, &user, "Food", "🍔", "expense").await;
    create_category(&app, &user, "Books", "📚", "expense").await;

    create_transaction(&app, &user, "2000", "2024-01-31T23:00:00Z", "income", "Salary").await;
    create_transaction(&app, &user, "30", "2024-02-01T08:00:00Z", "expense", "Food").await;
    create_transaction(&app, &user, "20.50", "2024-02-20T08:00:00Z", "expense", "Food").await;
    // Outside the range below
    create_transaction(&app, &user, "500", "2024-05-01T08:00:00Z", "expense", "Food").await;

    let range = "from=2024-01-31T15:00:00.000Z&to=2024-02-29T01:00:00.000Z";

    let (status, balance) =
        send(&app, "GET", &format!("/api/stats/balance?{range}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&balance["income"]), dec!(2000));
    assert_eq!(amount(&balance["expense"]), dec!(50.50));

    let (status, categories) =
        send(&app, "GET", &format!("/api/stats/categories?{range}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories[0]["category"], "Books");
    assert_eq!(amount(&categories[0]["amount"]), Decimal::ZERO);
    assert_eq!(categories[1]["category"], "Food");
    assert_eq!(categories[1]["categoryIcon"], "🍔");
    assert_eq!(amount(&categories[1]["amount"]), dec!(50.50));
    assert_eq!(categories[2]["type"], "income");
    assert_eq!(amount(&categories[2]["amount"]), dec!(2000));

    let (status, monthly) =
        send(&app, "GET", &format!("/api/stats/monthly?{range}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(monthly[0]["month"], "1/2024");
    assert_eq!(amount(&monthly[0]["income"]), dec!(2000));
    assert_eq!(monthly[1]["month"], "2/2024");
    assert_eq!(amount(&monthly[1]["expense"]), dec!(50.50));
    assert_eq!(monthly.as_array().unwrap().len(), 2);

    let (_, list) = send(
        &app,
        "GET",
        &format!("/api/transactions?{range}&category=Food&type=expense"),
        Some(&user),
        None,
    )
    .await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    // Newest first
    assert_eq!(amount(&list[0]["amount"]), dec!(20.50));
}

#[tokio::test]
async fn test_history_periods_default_to_current_year() {
    let Some(pool) = common::setup_test_db().await else {
        return;
    };
    let app = test_app(pool);

    let (status, periods) = send(&app, "GET", "/api/history-periods", Some(&new_user()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(periods, json!([chrono::Datelike::year(&chrono::Utc::now())]));
}
