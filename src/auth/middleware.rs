use crate::auth::jwt::TokenError;
use crate::types::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, Extensions, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Returned by [`user_id_from_extensions`] when no identity is attached.
pub const UNAUTHENTICATED_USER_ID: i64 = -1;

/// Identity attached to a request once its token has been verified and its
/// subject resolved to an existing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
enum DenyReason {
    #[error("missing bearer token")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("user {0} does not exist")]
    UnknownUser(i64),

    #[error("failed to load user {0}: {1}")]
    Lookup(i64, AppError),
}

/// Guards a route: verifies the bearer token, loads the user it names and
/// attaches an [`AuthenticatedUser`] before calling the inner handler.
///
/// Every refusal produces the same `403 {"error":"permission denied"}`
/// response; the reason is only logged.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let outcome = authenticate(&state, req.headers()).await;

    match outcome {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(reason) => {
            tracing::warn!(
                reason = %reason,
                method = %req.method(),
                path = %req.uri().path(),
                "permission denied"
            );
            AppError::PermissionDenied.into_response()
        }
    }
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, DenyReason> {
    let token = bearer_token(headers).ok_or(DenyReason::MissingToken)?;
    let user_id = state.auth_service.verify_token(token)?;

    match state.users.get_user_by_id(user_id).await {
        Ok(Some(user)) => Ok(AuthenticatedUser { id: user.id }),
        Ok(None) => Err(DenyReason::UnknownUser(user_id)),
        Err(e) => Err(DenyReason::Lookup(user_id, e)),
    }
}

/// Extracts the credential from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Reads the authenticated user id, or [`UNAUTHENTICATED_USER_ID`] when the
/// request did not pass through [`require_auth`]. Handlers take the typed
/// [`AuthUser`] extractor, which is built on this lookup.
pub fn user_id_from_extensions(extensions: &Extensions) -> i64 {
    extensions
        .get::<AuthenticatedUser>()
        .map(|user| user.id)
        .unwrap_or(UNAUTHENTICATED_USER_ID)
}

/// Extractor for the identity attached by [`require_auth`].
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match user_id_from_extensions(&parts.extensions) {
            UNAUTHENTICATED_USER_ID => Err(AppError::PermissionDenied),
            id => Ok(AuthUser(AuthenticatedUser { id })),
        }
    }
}
