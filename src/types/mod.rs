use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::pipeline::{write_error, Validate, ValidationErrors, Violations};

/// Status given to every order created by a checkout.
pub const ORDER_STATUS_PENDING: &str = "pending";

// ============= Domain Types =============

/// A registered account. The stored credential is never serialized.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// PHC-formatted password hash
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub total: f64,
    pub status: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub total: f64,
    pub status: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    #[serde(rename = "orderID")]
    pub order_id: i64,
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price at the time of purchase
    pub price: f64,
}

// ============= API Request/Response Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartCheckoutItem {
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartCheckoutPayload {
    #[serde(default)]
    pub items: Vec<CartCheckoutItem>,
    #[serde(default)]
    pub address: String,
}

impl Validate for RegisterUserRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Violations::default()
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .required("email", &self.email)
            .email("email", &self.email)
            .required("password", &self.password)
            .length("password", &self.password, 4, 128)
            .finish()
    }
}

impl Validate for LoginUserRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Violations::default()
            .required("email", &self.email)
            .email("email", &self.email)
            .required("password", &self.password)
            .finish()
    }
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Violations::default()
            .required("name", &self.name)
            .positive("price", self.price)
            .non_negative("quantity", self.quantity)
            .finish()
    }
}

// Empty carts are reported by the checkout itself.
impl Validate for CartCheckoutPayload {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Violations::default()
            .required("address", &self.address)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Body returned by endpoints that create a record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub total_price: f64,
    pub order_id: i64,
}

/// JSON error envelope shared by every failing response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// JWT claims carried by an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a decimal string
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("request body is too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::InvalidInput(format!("invalid request payload: {}", errors))
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, "permission denied".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body is too large".to_string(),
            ),
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        write_error(status, message)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::PermissionDenied, StatusCode::FORBIDDEN),
            (AppError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (AppError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (AppError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Hashing("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Signing("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_user_password_is_never_serialized() {
        let user = User {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).expect("should serialize");
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Ada");
    }
}
