//! Authentication core
//!
//! This module provides the credential and identity infrastructure for the
//! storefront API.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - signed identity token issuance and verification
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor for protected routes
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id with a random salt per credential
//! - **Tokens**: HS256 signed, subject = user id, expiry checked with zero leeway
//! - **Uniform Denial**: every failed check answers `403 {"error":"permission denied"}`
//!
//! # Usage
//!
//! ## Protecting Routes
//!
//! ```ignore
//! use storefront::auth::middleware::require_auth;
//!
//! let protected = Router::new()
//!     .route("/cart/checkout", post(checkout))
//!     .layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! ## Reading the Identity in Handlers
//!
//! ```ignore
//! async fn checkout(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("Hello, user {}!", user.id)
//! }
//! ```
//!
//! # Configuration
//!
//! Configure via environment:
//! ```text
//! JWT_SECRET=your-secret-key          # Required in production
//! JWT_EXPIRATION_IN_SECONDS=604800    # Token validity duration
//! ```

/// Token issuance and verification.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing and verification.
pub mod password;
