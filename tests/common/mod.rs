//! Shared fixtures for the integration tests.
//!
//! Every test server runs on a fresh [`MemoryStore`] so tests stay isolated
//! and can inspect or break the store directly.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::{
    api::routes::build_app,
    auth::password::hash_password,
    db::{MemoryStore, ProductStore, UserStore},
    types::{CreateProductRequest, NewUser},
    utils::config::Config,
    AppState,
};

pub const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";
pub const TEST_EMAIL: &str = "exists@google.com";
pub const TEST_PASSWORD: &str = "1234";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "DATABASE_URL" => Some(":memory:".to_string()),
        _ => None,
    })
    .expect("test config should load")
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(test_config(), store.clone());
        let server = TestServer::new(build_app(state.clone())).expect("Failed to create test server");

        Self {
            server,
            store,
            state,
        }
    }

    /// Inserts a user directly into the store and returns its id.
    pub async fn seed_user(&self, email: &str, password: &str) -> i64 {
        self.store
            .create_user(NewUser {
                first_name: "Sebastian".to_string(),
                last_name: "Nunez".to_string(),
                email: email.to_string(),
                password: hash_password(password).expect("should hash"),
            })
            .await
            .expect("Failed to create test user")
    }

    pub async fn seed_product(&self, name: &str, price: f64, quantity: i64) -> i64 {
        self.store
            .create_product(&CreateProductRequest {
                name: name.to_string(),
                description: format!("{name} description"),
                image: format!("{name}.png"),
                price,
                quantity,
            })
            .await
            .expect("Failed to create test product")
    }

    /// Seeds the default user and returns a token for it.
    pub async fn login_token(&self) -> String {
        let user_id = self.seed_user(TEST_EMAIL, TEST_PASSWORD).await;
        self.state
            .auth_service
            .issue_token(user_id)
            .expect("should issue token")
    }
}

pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}
