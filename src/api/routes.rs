use crate::api::handlers::{cart, products, users};
use crate::api::ApiDoc;
use crate::auth::middleware::require_auth;
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// Largest request body accepted, in bytes. Larger bodies are refused by
/// [`ValidatedJson`](crate::api::pipeline::ValidatedJson) with a JSON 413.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Routes mounted under `/api/v1`.
///
/// Protected endpoints carry the [`require_auth`] layer on their method
/// router, so `GET /products` stays public while `POST /products` does not.
pub fn create_router(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, require_auth);

    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/users", get(users::list_users).route_layer(auth.clone()))
        .route("/users/{id}", get(users::get_user).route_layer(auth.clone()))
        .route(
            "/products",
            get(products::list_products)
                .merge(post(products::create_product).route_layer(auth.clone())),
        )
        .route("/products/{id}", get(products::get_product))
        .route("/cart/checkout", post(cart::checkout).route_layer(auth))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}

/// The complete application: health check, versioned API and the
/// cross-cutting tower layers.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/v1", create_router(state.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
