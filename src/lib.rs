//! # Storefront
//!
//! An e-commerce REST backend built on Axum: user registration and login,
//! a product catalog, and cart checkout backed by a relational store.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `storefront-server` binary
//! 2. **As a library** - Build the router around your own store
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use storefront::{api::routes::build_app, db::SqlStore, utils::config::Config, AppState};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(SqlStore::new_local(&config.database.url).await?);
//!     let app = build_app(AppState::new(config, store));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST handlers, request pipeline and routes
//! - [`auth`] - Password hashing, tokens and the auth middleware
//! - [`db`] - Store traits plus libsql and in-memory implementations
//! - [`types`] - Domain types, payloads and error handling
//! - [`utils`] - Configuration and logging

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
#[allow(missing_docs)]
pub mod api;
/// Password hashing, token issuance and auth middleware.
#[allow(missing_docs)]
pub mod auth;
/// Data store traits and implementations.
pub mod db;
/// Core types (requests, responses, errors).
#[allow(missing_docs)]
pub mod types;
/// Configuration and logging utilities.
#[allow(missing_docs)]
pub mod utils;

pub use types::{AppError, Result};

use crate::auth::jwt::AuthService;
use crate::db::{OrderStore, ProductStore, UserStore};
use crate::utils::config::Config;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Process configuration, loaded once at startup
    pub config: Arc<Config>,
    /// Token issuance and verification
    pub auth_service: Arc<AuthService>,
    /// User records
    pub users: Arc<dyn UserStore>,
    /// Product catalog
    pub products: Arc<dyn ProductStore>,
    /// Orders and order items
    pub orders: Arc<dyn OrderStore>,
}

impl AppState {
    /// Builds the state around a single store that provides every capability.
    pub fn new<S>(config: Config, store: Arc<S>) -> Self
    where
        S: UserStore + ProductStore + OrderStore + 'static,
    {
        let auth_service = Arc::new(AuthService::from_config(&config.auth));

        Self {
            config: Arc::new(config),
            auth_service,
            users: store.clone(),
            products: store.clone(),
            orders: store,
        }
    }
}
