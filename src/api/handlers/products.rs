use crate::{
    api::pipeline::{write_json, ValidatedJson},
    auth::middleware::AuthUser,
    types::{AppError, CreateProductRequest, CreatedResponse, ErrorResponse, Product, Result},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::parse_id;

/// List the catalog
#[utoipa::path(
    get,
    path = "/api/v1/products",
    responses((status = 200, description = "All products", body = Vec<Product>)),
    tag = "products"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products.get_products().await?))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&raw_id, "product")?;

    state
        .products
        .get_product_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product with id {} not found", id)))
}

/// Add a product to the catalog
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = CreatedResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Permission denied", body = ErrorResponse)
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> Result<Response> {
    let id = state.products.create_product(&payload).await?;

    tracing::info!(product_id = id, created_by = user.id, "product created");
    Ok(write_json(StatusCode::CREATED, CreatedResponse { id }))
}
