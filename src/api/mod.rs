//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::pipeline`](crate::api::pipeline) - JSON decode, validation and response envelope
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints (`/api/v1`)
//!
//! ## Users
//! - `POST /register` - Register new user
//! - `POST /login` - Login and receive a token
//! - `GET /users` - List users (auth)
//! - `GET /users/{id}` - Get one user (auth)
//!
//! ## Products
//! - `GET /products` - List the catalog
//! - `GET /products/{id}` - Get one product
//! - `POST /products` - Create a product (auth)
//!
//! ## Cart
//! - `POST /cart/checkout` - Place an order (auth)
//!
//! # Authentication
//!
//! Protected endpoints require a token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//! Any failure answers `403 {"error":"permission denied"}`.
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api/v1/openapi.json`.

use crate::types::{
    CartCheckoutItem, CartCheckoutPayload, CheckoutResponse, CreateProductRequest,
    CreatedResponse, ErrorResponse, LoginUserRequest, Product, RegisterUserRequest, TokenResponse,
    User,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Request decode/validate/encode conventions.
pub mod pipeline;
/// Router configuration and route definitions.
pub mod routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::users::register,
        handlers::users::login,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::cart::checkout,
    ),
    components(schemas(
        RegisterUserRequest,
        LoginUserRequest,
        TokenResponse,
        CreatedResponse,
        ErrorResponse,
        User,
        Product,
        CreateProductRequest,
        CartCheckoutItem,
        CartCheckoutPayload,
        CheckoutResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "users", description = "Registration, login and accounts"),
        (name = "products", description = "Product catalog"),
        (name = "cart", description = "Checkout"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
