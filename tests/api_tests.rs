//! API integration tests
//!
//! These tests drive the full router (pipeline, middleware and handlers)
//! against an in-memory store.

mod common;

use axum::http::StatusCode;
use common::{error_body, TestApp, TEST_EMAIL, TEST_PASSWORD};
use rstest::rstest;
use serde_json::{json, Value};
use std::future::IntoFuture;
use storefront::api::routes::MAX_BODY_BYTES;
use storefront::db::{ProductStore, UserStore};

// ============= Health & Docs =============

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/openapi.json").await;

    response.assert_status_ok();
    let doc: Value = response.json();
    assert!(doc["paths"]["/api/v1/register"].is_object());
    assert!(doc["paths"]["/api/v1/cart/checkout"].is_object());
}

// ============= Registration =============

#[tokio::test]
async fn test_register_creates_user() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/register")
        .json(&json!({
            "firstName": "Sebastian",
            "lastName": "Nunez",
            "email": "snunez@google.com",
            "password": "1234"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["id"].as_i64().expect("id should be a number");

    let stored = app
        .store
        .get_user_by_id(id)
        .await
        .unwrap()
        .expect("user should be stored");
    assert_eq!(stored.email, "snunez@google.com");
    assert_ne!(stored.password, "1234", "password must be stored hashed");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = TestApp::new();
    app.seed_user(TEST_EMAIL, TEST_PASSWORD).await;

    let response = app
        .server
        .post("/api/v1/register")
        .json(&json!({
            "firstName": "Sebastian",
            "lastName": "Nunez",
            "email": TEST_EMAIL,
            "password": "1234"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body(&format!(
        "user with email {} already exists",
        TEST_EMAIL
    )));
}

#[tokio::test]
async fn test_register_with_empty_body() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/register")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body("missing request body"));
}

#[tokio::test]
async fn test_register_with_malformed_json() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/register")
        .content_type("application/json")
        .text("{\"email\": ")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid JSON payload"));
}

#[tokio::test]
async fn test_oversized_body_uses_error_envelope() {
    let app = TestApp::new();
    let padding = "x".repeat(MAX_BODY_BYTES + 1);

    let response = app
        .server
        .post("/api/v1/register")
        .json(&json!({ "firstName": padding }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    response.assert_json(&error_body("request body is too large"));
}

#[rstest]
#[case::missing_first_name(json!({"lastName": "Nunez", "email": "a@b.com", "password": "1234"}), "firstName")]
#[case::invalid_email(json!({"firstName": "S", "lastName": "N", "email": "not-an-email", "password": "1234"}), "email")]
#[case::short_password(json!({"firstName": "S", "lastName": "N", "email": "a@b.com", "password": "123"}), "password")]
#[tokio::test]
async fn test_register_validation(#[case] payload: Value, #[case] field: &str) {
    let app = TestApp::new();

    let response = app.server.post("/api/v1/register").json(&payload).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("invalid request payload"));
    assert!(message.contains(field), "{message} should name {field}");
}

#[tokio::test]
async fn test_responses_are_json() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/register")
        .json(&json!({}))
        .await;

    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "application/json"
    );
}

// ============= Login =============

#[tokio::test]
async fn test_login_returns_token() {
    let app = TestApp::new();
    let user_id = app.seed_user(TEST_EMAIL, TEST_PASSWORD).await;

    let response = app
        .server
        .post("/api/v1/login")
        .json(&json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["token"].as_str().expect("token should be present");
    assert_eq!(app.state.auth_service.verify_token(token).unwrap(), user_id);
}

#[rstest]
#[case::unknown_email("nobody@google.com", TEST_PASSWORD)]
#[case::wrong_password(TEST_EMAIL, "wrong")]
#[tokio::test]
async fn test_login_rejects_bad_credentials(#[case] email: &str, #[case] password: &str) {
    let app = TestApp::new();
    app.seed_user(TEST_EMAIL, TEST_PASSWORD).await;

    let response = app
        .server
        .post("/api/v1/login")
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body("invalid email or password"));
}

#[tokio::test]
async fn test_login_store_failure_is_internal_error() {
    let app = TestApp::new();
    app.store.fail_with("disk on fire");

    let response = app
        .server
        .post("/api/v1/login")
        .json(&json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&error_body("internal server error"));
}

// ============= Users =============

#[tokio::test]
async fn test_get_user_by_id() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let other = app.seed_user("other@google.com", "abcd").await;

    let response = app
        .server
        .get(&format!("/api/v1/users/{}", other))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "other@google.com");
    assert!(body.get("password").is_none());
}

#[rstest]
#[case::malformed("abc", StatusCode::BAD_REQUEST, "invalid user id: abc")]
#[case::missing("4242", StatusCode::NOT_FOUND, "user with id 4242 not found")]
#[tokio::test]
async fn test_get_user_errors(
    #[case] raw_id: &str,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let app = TestApp::new();
    let token = app.login_token().await;

    let response = app
        .server
        .get(&format!("/api/v1/users/{}", raw_id))
        .authorization_bearer(&token)
        .await;

    response.assert_status(status);
    response.assert_json(&error_body(message));
}

// ============= Products =============

#[tokio::test]
async fn test_list_and_get_products() {
    let app = TestApp::new();
    let id = app.seed_product("Jordans", 125.0, 5).await;
    app.seed_product("Socks", 2.5, 100).await;

    let list: Value = app.server.get("/api/v1/products").await.json();
    assert_eq!(list.as_array().unwrap().len(), 2);

    let response = app.server.get(&format!("/api/v1/products/{}", id)).await;
    response.assert_status_ok();
    let product: Value = response.json();
    assert_eq!(product["name"], "Jordans");
    assert_eq!(product["price"], 125.0);
    assert_eq!(product["quantity"], 5);
}

#[tokio::test]
async fn test_get_missing_product() {
    let app = TestApp::new();

    let response = app.server.get("/api/v1/products/77").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&error_body("product with id 77 not found"));
}

#[tokio::test]
async fn test_create_product() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let response = app
        .server
        .post("/api/v1/products")
        .authorization_bearer(&token)
        .json(&json!({
            "name": "Jordans",
            "description": "Basketball shoes",
            "image": "jordans.png",
            "price": 125.0,
            "quantity": 5
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_i64().unwrap();

    let stored = app.store.get_product_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Jordans");
    assert_eq!(stored.quantity, 5);
}

#[rstest]
#[case::missing_name(json!({"price": 10.0, "quantity": 1}), "name")]
#[case::zero_price(json!({"name": "Hat", "price": 0.0, "quantity": 1}), "price")]
#[case::negative_quantity(json!({"name": "Hat", "price": 10.0, "quantity": -1}), "quantity")]
#[tokio::test]
async fn test_create_product_validation(#[case] payload: Value, #[case] field: &str) {
    let app = TestApp::new();
    let token = app.login_token().await;

    let response = app
        .server
        .post("/api/v1/products")
        .authorization_bearer(&token)
        .json(&payload)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let message = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(message.contains(field), "{message} should name {field}");
}

// ============= Checkout =============

#[tokio::test]
async fn test_checkout_places_order() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let shoes = app.seed_product("Jordans", 125.0, 5).await;
    let socks = app.seed_product("Socks", 2.5, 10).await;

    let response = app
        .server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({
            "address": "1 Infinite Loop",
            "items": [
                { "productID": shoes, "quantity": 2 },
                { "productID": socks, "quantity": 3 },
                { "productID": shoes, "quantity": 1 }
            ]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_price"], 382.5);
    let order_id = body["order_id"].as_i64().unwrap();

    let orders = app.store.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order_id);
    assert_eq!(orders[0].status, "pending");
    assert_eq!(orders[0].address, "1 Infinite Loop");

    let items = app.store.order_items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item.order_id == order_id));

    let shoes_left = app.store.get_product_by_id(shoes).await.unwrap().unwrap();
    let socks_left = app.store.get_product_by_id(socks).await.unwrap().unwrap();
    assert_eq!(shoes_left.quantity, 2);
    assert_eq!(socks_left.quantity, 7);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let response = app
        .server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "address": "somewhere", "items": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body("cart is empty"));
}

#[tokio::test]
async fn test_checkout_rejects_unknown_product() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let response = app
        .server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "address": "somewhere", "items": [{ "productID": 99, "quantity": 1 }] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body(
        "product 99 is not available in the store, please refresh your cart",
    ));
    assert!(app.store.orders().is_empty());
}

#[tokio::test]
async fn test_checkout_rejects_insufficient_stock() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let shoes = app.seed_product("Jordans", 125.0, 1).await;

    let response = app
        .server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "address": "somewhere", "items": [{ "productID": shoes, "quantity": 2 }] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body(
        "product Jordans is not available in the quantity requested",
    ));

    let unchanged = app.store.get_product_by_id(shoes).await.unwrap().unwrap();
    assert_eq!(unchanged.quantity, 1);
}

#[tokio::test]
async fn test_checkout_rejects_bad_quantity() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let shoes = app.seed_product("Jordans", 125.0, 5).await;

    let response = app
        .server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "address": "somewhere", "items": [{ "productID": shoes, "quantity": 0 }] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body(&format!(
        "invalid quantity for the product {}",
        shoes
    )));
}

#[tokio::test]
async fn test_checkout_records_authenticated_user() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let user = app
        .store
        .get_user_by_email(TEST_EMAIL)
        .await
        .unwrap()
        .unwrap();
    let shoes = app.seed_product("Jordans", 125.0, 5).await;

    app.server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({ "address": "somewhere", "items": [{ "productID": shoes, "quantity": 1 }] }))
        .await
        .assert_status_ok();

    assert_eq!(app.store.orders()[0].user_id, user.id);
}

#[tokio::test]
async fn test_checkout_rejects_overflowing_repeated_quantity() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let shoes = app.seed_product("Jordans", 125.0, 5).await;
    let half = i64::MAX / 2 + 1;

    let response = app
        .server
        .post("/api/v1/cart/checkout")
        .authorization_bearer(&token)
        .json(&json!({
            "address": "somewhere",
            "items": [
                { "productID": shoes, "quantity": half },
                { "productID": shoes, "quantity": half }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&error_body(&format!(
        "invalid quantity for the product {}",
        shoes
    )));

    let unchanged = app.store.get_product_by_id(shoes).await.unwrap().unwrap();
    assert_eq!(unchanged.quantity, 5);
    assert!(app.store.orders().is_empty());
}

#[tokio::test]
async fn test_concurrent_checkouts_never_oversell() {
    let app = TestApp::new();
    let token = app.login_token().await;
    let shoes = app.seed_product("Jordans", 125.0, 5).await;
    let cart = json!({ "address": "somewhere", "items": [{ "productID": shoes, "quantity": 5 }] });

    let (first, second) = tokio::join!(
        app.server
            .post("/api/v1/cart/checkout")
            .authorization_bearer(&token)
            .json(&cart)
            .into_future(),
        app.server
            .post("/api/v1/cart/checkout")
            .authorization_bearer(&token)
            .json(&cart)
            .into_future(),
    );

    let mut statuses = vec![first.status_code(), second.status_code()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let left = app.store.get_product_by_id(shoes).await.unwrap().unwrap();
    assert_eq!(left.quantity, 0);
    assert_eq!(app.store.orders().len(), 1);
}
