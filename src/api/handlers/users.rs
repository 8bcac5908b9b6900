//! Account handlers: registration, login and user lookup.

use crate::{
    api::pipeline::{write_json, ValidatedJson},
    auth::password::{hash_password, verify_password},
    types::{
        AppError, CreatedResponse, ErrorResponse, LoginUserRequest, NewUser, RegisterUserRequest,
        Result, TokenResponse, User,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::parse_id;

fn invalid_credentials() -> AppError {
    AppError::InvalidInput("invalid email or password".to_string())
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = CreatedResponse),
        (status = 400, description = "Invalid payload or email already taken", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> Result<Response> {
    if let Some(existing) = state.users.get_user_by_email(&payload.email).await? {
        return Err(AppError::InvalidInput(format!(
            "user with email {} already exists",
            existing.email
        )));
    }

    let password = hash_password(&payload.password)?;

    let id = state
        .users
        .create_user(NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password,
        })
        .await?;

    tracing::info!(user_id = id, "user registered");
    Ok(write_json(StatusCode::CREATED, CreatedResponse { id }))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginUserRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid payload or credentials", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginUserRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .users
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&user.password, &payload.password) {
        tracing::debug!(user_id = user.id, "password mismatch");
        return Err(invalid_credentials());
    }

    let token = state.auth_service.issue_token(user.id)?;

    Ok(Json(TokenResponse { token }))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = Vec<User>),
        (status = 403, description = "Permission denied", body = ErrorResponse)
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.get_users().await?))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 403, description = "Permission denied", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users",
    security(("bearer" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>> {
    let id = parse_id(&raw_id, "user")?;

    state
        .users
        .get_user_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user with id {} not found", id)))
}
