//! Cart checkout.
//!
//! A checkout turns the cart into a pending order: stock is checked for every
//! line, the total is computed from current prices, stock is reserved with a
//! guarded decrement and the order plus one item per product are written.

use crate::{
    api::pipeline::ValidatedJson,
    auth::middleware::AuthUser,
    types::{
        AppError, CartCheckoutItem, CartCheckoutPayload, CheckoutResponse, ErrorResponse,
        NewOrder, NewOrderItem, Product, Result, ORDER_STATUS_PENDING,
    },
    AppState,
};
use axum::{extract::State, Json};
use std::collections::HashMap;

/// Place an order for the items in the cart
#[utoipa::path(
    post,
    path = "/api/v1/cart/checkout",
    request_body = CartCheckoutPayload,
    responses(
        (status = 200, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Invalid cart or insufficient stock", body = ErrorResponse),
        (status = 403, description = "Permission denied", body = ErrorResponse)
    ),
    tag = "cart",
    security(("bearer" = []))
)]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CartCheckoutPayload>,
) -> Result<Json<CheckoutResponse>> {
    let lines = cart_quantities(&payload.items)?;
    let ids: Vec<i64> = lines.iter().map(|(id, _)| *id).collect();

    let products: HashMap<i64, Product> = state
        .products
        .get_products_by_ids(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    check_stock(&lines, &products)?;
    let total_price = total_price(&lines, &products);

    reserve_stock(&state, &lines, &products).await?;

    let order_id = state
        .orders
        .create_order(NewOrder {
            user_id: user.id,
            total: total_price,
            status: ORDER_STATUS_PENDING.to_string(),
            address: payload.address,
        })
        .await?;

    for (product_id, quantity) in &lines {
        state
            .orders
            .create_order_item(NewOrderItem {
                order_id,
                product_id: *product_id,
                quantity: *quantity,
                price: products[product_id].price,
            })
            .await?;
    }

    tracing::info!(order_id, user_id = user.id, total_price, "order placed");
    Ok(Json(CheckoutResponse {
        total_price,
        order_id,
    }))
}

/// Takes every line out of stock. The store applies each decrement only when
/// enough units remain, so a concurrent checkout that drained the product
/// between the read and this write is refused; lines already taken are put
/// back.
async fn reserve_stock(
    state: &AppState,
    lines: &[(i64, i64)],
    products: &HashMap<i64, Product>,
) -> Result<()> {
    for (taken, (product_id, quantity)) in lines.iter().enumerate() {
        if state.products.decrement_stock(*product_id, *quantity).await? {
            continue;
        }

        for (reserved_id, reserved_quantity) in &lines[..taken] {
            state.products.restock(*reserved_id, *reserved_quantity).await?;
        }

        let name = products
            .get(product_id)
            .map(|p| p.name.as_str())
            .unwrap_or_default();
        return Err(AppError::InvalidInput(format!(
            "product {} is not available in the quantity requested",
            name
        )));
    }

    Ok(())
}

/// Folds cart items into `(product_id, quantity)` lines, summing repeated
/// products and keeping first-seen order.
pub fn cart_quantities(items: &[CartCheckoutItem]) -> Result<Vec<(i64, i64)>> {
    if items.is_empty() {
        return Err(AppError::InvalidInput("cart is empty".to_string()));
    }

    let invalid_quantity = |product_id: i64| {
        AppError::InvalidInput(format!("invalid quantity for the product {}", product_id))
    };

    let mut lines: Vec<(i64, i64)> = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity <= 0 {
            return Err(invalid_quantity(item.product_id));
        }

        match lines.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, quantity)) => {
                *quantity = quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| invalid_quantity(item.product_id))?;
            }
            None => lines.push((item.product_id, item.quantity)),
        }
    }

    Ok(lines)
}

pub fn check_stock(lines: &[(i64, i64)], products: &HashMap<i64, Product>) -> Result<()> {
    for (product_id, quantity) in lines {
        let product = products.get(product_id).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "product {} is not available in the store, please refresh your cart",
                product_id
            ))
        })?;

        if product.quantity < *quantity {
            return Err(AppError::InvalidInput(format!(
                "product {} is not available in the quantity requested",
                product.name
            )));
        }
    }

    Ok(())
}

/// Sum of unit price times quantity. Every line must have a product.
pub fn total_price(lines: &[(i64, i64)], products: &HashMap<i64, Product>) -> f64 {
    lines
        .iter()
        .filter_map(|(id, quantity)| products.get(id).map(|p| p.price * *quantity as f64))
        .sum()
}
