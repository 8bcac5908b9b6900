use crate::types::{AppError, Claims, Result};
use crate::utils::config::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Default token lifetime: seven days.
pub const DEFAULT_JWT_EXPIRATION_SECS: i64 = 3600 * 24 * 7;

/// Reasons a presented token is refused. Logged server-side only; callers
/// always see `permission denied`.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("token subject is not a user id: {0:?}")]
    MalformedSubject(String),
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::PermissionDenied
    }
}

/// Creates an HS256-signed token for `user_id` that expires
/// `lifetime_secs` seconds from now.
pub fn create_jwt(secret: &[u8], user_id: i64, lifetime_secs: i64) -> Result<String> {
    let now = Utc::now();
    let expires_at = Duration::try_seconds(lifetime_secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            AppError::Signing(format!("token lifetime out of range: {}s", lifetime_secs))
        })?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp().max(0) as usize,
        exp: expires_at.timestamp().max(0) as usize,
    };

    encode_claims(secret, &claims)
}

fn encode_claims(secret: &[u8], claims: &Claims) -> Result<String> {
    if secret.is_empty() {
        return Err(AppError::Signing("JWT secret must not be empty".to_string()));
    }

    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Signing(format!("Failed to generate token: {}", e)))
}

/// Verifies the signature and expiry of `token` and returns its claims.
///
/// Only the HMAC family is accepted, and expiry is checked with zero leeway.
pub fn validate_jwt(secret: &[u8], token: &str) -> std::result::Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(data.claims)
}

/// Parses the token subject back into a user id.
pub fn subject_user_id(claims: &Claims) -> std::result::Result<i64, TokenError> {
    claims
        .sub
        .parse::<i64>()
        .map_err(|_| TokenError::MalformedSubject(claims.sub.clone()))
}

/// Token issuance and verification bound to the server's secret and
/// configured lifetime.
pub struct AuthService {
    jwt_secret: String,
    expiration_secs: i64,
}

impl AuthService {
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing tokens
    /// * `expiration_secs` - Token validity in seconds
    pub fn new(jwt_secret: String, expiration_secs: i64) -> Self {
        Self {
            jwt_secret,
            expiration_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.jwt_expiration_secs)
    }

    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }

    /// Issues a token whose subject is `user_id`.
    pub fn issue_token(&self, user_id: i64) -> Result<String> {
        create_jwt(self.jwt_secret.as_bytes(), user_id, self.expiration_secs)
    }

    /// Verifies a token and resolves its subject to a user id.
    pub fn verify_token(&self, token: &str) -> std::result::Result<i64, TokenError> {
        let claims = validate_jwt(self.jwt_secret.as_bytes(), token)?;
        subject_user_id(&claims)
    }
}
