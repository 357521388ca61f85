//! HTTP-level integration tests for the `/api/v1` resources.

mod common;

use axum::http::StatusCode;
use common::{body_json, coffee, delete, get, patch_json, post_json, put_json, TestApp};
use serde_json::json;
use sqlx::SqlitePool;

async fn create_category(app: &TestApp, name: &str) -> i64 {
    let response = post_json(app.router(), "/api/v1/categories", json!({"name": name})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

fn january(category_id: i64) -> serde_json::Value {
    json!({
        "category_id": category_id,
        "amount": 300,
        "start_date": "2024-01-01",
        "end_date": "2024-01-31"
    })
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_crud(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let response = post_json(
        app.router(),
        "/api/v1/categories",
        json!({"name": "Food", "description": "Eating"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Food");
    assert!(created["created_at"].is_string());
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        app.router(),
        &format!("/api/v1/categories/{id}"),
        json!({"name": "Meals"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Meals");
    assert_eq!(json["description"], "Eating");

    let response = put_json(
        app.router(),
        &format!("/api/v1/categories/{id}"),
        json!({"name": "Dining"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Dining");
    assert!(json["description"].is_null());

    let response = delete(app.router(), &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.router(), &format!("/api/v1/categories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_category_returns_409(pool: SqlitePool) {
    let app = TestApp::new(pool);
    create_category(&app, "Food").await;

    let response = post_json(app.router(), "/api/v1/categories", json!({"name": "food"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_validation_reports_fields(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = post_json(
        app.router(),
        "/api/v1/categories",
        json!({"name": "x".repeat(101)}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["name"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_name_is_trimmed_and_must_not_be_blank(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let response = post_json(app.router(), "/api/v1/categories", json!({"name": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["name"], json!(["This field may not be blank."]));

    let response = post_json(app.router(), "/api/v1/categories", json!({"name": " Food "})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Food");
    let id = created["id"].as_i64().unwrap();

    let response = post_json(app.router(), "/api/v1/categories", json!({"name": "Food  "})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "A category with this name already exists."
    );

    let uri = format!("/api/v1/categories/{id}");
    let response = put_json(app.router(), &uri, json!({"name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["name"].is_array());

    let response = patch_json(app.router(), &uri, json!({"name": " \t "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["name"].is_array());

    let json = body_json(get(app.router(), &uri).await).await;
    assert_eq!(json["name"], "Food");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_list_pagination(pool: SqlitePool) {
    let app = TestApp::new(pool);
    for name in ["Rent", "Food", "Travel"] {
        create_category(&app, name).await;
    }

    let json = body_json(get(app.router(), "/api/v1/categories").await).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Food", "Rent", "Travel"]);

    let json = body_json(get(app.router(), "/api/v1/categories?limit=1&offset=1").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Rent");
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_crud(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let food = create_category(&app, "Food").await;

    let response = post_json(app.router(), "/api/v1/budgets", january(food)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["amount"], 300);
    assert_eq!(created["start_date"], "2024-01-01");
    let id = created["id"].as_i64().unwrap();

    let response = patch_json(
        app.router(),
        &format!("/api/v1/budgets/{id}"),
        json!({"amount": 350}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["amount"], 350);

    let mut replacement = january(food);
    replacement["end_date"] = json!("2024-02-29");
    let response = put_json(app.router(), &format!("/api/v1/budgets/{id}"), replacement).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["end_date"], "2024-02-29");
    assert_eq!(json["amount"], 300);

    let response = delete(app.router(), &format!("/api/v1/budgets/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete(app.router(), &format!("/api/v1/budgets/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_unknown_category_returns_400(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = post_json(app.router(), "/api/v1/budgets", january(777)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["category_id"],
        json!(["Invalid pk \"777\" - object does not exist."])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_period_must_not_be_reversed(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let food = create_category(&app, "Food").await;

    let mut body = january(food);
    body["end_date"] = json!("2023-12-31");
    let response = post_json(app.router(), "/api/v1/budgets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["non_field_errors"].is_array());

    let created = body_json(post_json(app.router(), "/api/v1/budgets", january(food)).await).await;
    let id = created["id"].as_i64().unwrap();
    let response = patch_json(
        app.router(),
        &format!("/api/v1/budgets/{id}"),
        json!({"start_date": "2024-02-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_negative_amount_rejected(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let food = create_category(&app, "Food").await;
    let mut body = january(food);
    body["amount"] = json!(-1);
    let response = post_json(app.router(), "/api/v1/budgets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["amount"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_budget_missing_and_mistyped_fields_are_reported(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let food = create_category(&app, "Food").await;

    let mut body = january(food);
    body.as_object_mut().unwrap().remove("amount");
    let response = post_json(app.router(), "/api/v1/budgets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["amount"], json!(["This field is required."]));

    let mut body = january(food);
    body["amount"] = json!("lots");
    body["start_date"] = json!("next week");
    let response = post_json(app.router(), "/api/v1/budgets", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["amount"], json!(["A valid integer is required."]));
    assert!(json["fields"]["start_date"].is_array());

    let response = post_json(app.router(), "/api/v1/budgets", json!([1, 2])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["non_field_errors"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_category_deletes_its_budgets(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let food = create_category(&app, "Food").await;
    let rent = create_category(&app, "Rent").await;
    post_json(app.router(), "/api/v1/budgets", january(food)).await;
    post_json(app.router(), "/api/v1/budgets", january(rent)).await;

    let json = body_json(get(app.router(), &format!("/api/v1/budgets?category_id={food}")).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = delete(app.router(), &format!("/api/v1/categories/{food}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app.router(), "/api/v1/budgets").await).await;
    let budgets = json.as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category_id"], rent);
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expense_create_returns_object(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = post_json(app.router(), "/api/v1/expenses", coffee()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["expense_id"], 1);
    assert_eq!(json["expense_name"], "Coffee");
    assert!(json["expense_image"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expense_validation_uses_envelope(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let response = post_json(app.router(), "/api/v1/expenses", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["fields"]["expense_name"],
        json!(["This field is required."])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expense_put_requires_all_fields_patch_does_not(pool: SqlitePool) {
    let app = TestApp::new(pool);
    post_json(app.router(), "/api/v1/expenses", coffee()).await;

    let response = put_json(app.router(), "/api/v1/expenses/1", json!({"expense_amount": 6})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json(app.router(), "/api/v1/expenses/1", json!({"expense_amount": 6})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["expense_amount"], 6);

    let mut full = coffee();
    full["expense_name"] = json!("Espresso");
    let response = put_json(app.router(), "/api/v1/expenses/1", full).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["expense_name"], "Espresso");
    assert_eq!(json["expense_amount"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expense_list_filters(pool: SqlitePool) {
    let app = TestApp::new(pool);
    post_json(app.router(), "/api/v1/expenses", coffee()).await;
    post_json(
        app.router(),
        "/api/v1/expenses",
        json!({
            "expense_name": "Taxi",
            "expense_amount": 20,
            "expense_category": "Transport",
            "expense_date": "2024-01-03"
        }),
    )
    .await;

    let json = body_json(get(app.router(), "/api/v1/expenses?category=transport").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["expense_name"], "Taxi");

    let json = body_json(get(app.router(), "/api/v1/expenses?search=cof").await).await;
    assert_eq!(json[0]["expense_name"], "Coffee");

    let json = body_json(get(app.router(), "/api/v1/expenses?limit=1&offset=1").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["expense_name"], "Taxi");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expense_delete_returns_204(pool: SqlitePool) {
    let app = TestApp::new(pool);
    post_json(app.router(), "/api/v1/expenses", coffee()).await;

    let response = delete(app.router(), "/api/v1/expenses/1").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.router(), "/api/v1/expenses/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bad_path_and_query_use_envelope(pool: SqlitePool) {
    let app = TestApp::new(pool);

    for uri in [
        "/api/v1/expenses/abc",
        "/api/v1/categories/abc",
        "/api/v1/budgets/1.5",
        "/api/v1/expenses?limit=x",
        "/api/v1/budgets?category_id=food",
    ] {
        let response = get(app.router(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }
}
