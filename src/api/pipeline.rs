//! Request pipeline conventions shared by every handler.
//!
//! Write endpoints receive their body through [`ValidatedJson`], which decodes
//! the JSON payload and then runs the payload's [`Validate`] rules. Both steps
//! fail with [`AppError::InvalidInput`](crate::types::AppError), so a bad body
//! always surfaces as `400 {"error": "..."}`.
//!
//! Responses go out through [`write_json`] and [`write_error`], which always
//! set `Content-Type: application/json`.

use crate::types::{AppError, Result};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Decodes a request body into `T`.
///
/// An empty (or whitespace-only) body is reported as `missing request body`
/// rather than as a JSON syntax error.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::InvalidInput("missing request body".to_string()));
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("invalid JSON payload: {}", e)))
}

/// Writes `payload` as a JSON response with the given status.
pub fn write_json<T: Serialize>(status: StatusCode, payload: T) -> Response {
    (status, Json(payload)).into_response()
}

/// Writes the `{"error": <message>}` envelope.
pub fn write_error(status: StatusCode, message: impl Into<String>) -> Response {
    write_json(
        status,
        crate::types::ErrorResponse {
            error: message.into(),
        },
    )
}

// ============= Validation =============

/// Declarative field constraints for a decoded payload.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), ValidationErrors>;
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every constraint a payload violated, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Collects violations while a payload's rules run.
///
/// ```ignore
/// let mut v = Violations::default();
/// v.required("email", &self.email);
/// v.email("email", &self.email);
/// v.finish()
/// ```
#[derive(Debug, Default)]
pub struct Violations {
    errors: Vec<FieldViolation>,
}

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    fn has(&self, field: &'static str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Field must contain at least one non-whitespace character.
    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
        self
    }

    /// Field must look like an email address. Skipped when the field already
    /// failed `required`.
    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        if !self.has(field) && !is_valid_email(value) {
            self.push(field, "must be a valid email address");
        }
        self
    }

    /// Character count must lie within `min..=max`.
    pub fn length(&mut self, field: &'static str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if !self.has(field) && (len < min || len > max) {
            self.push(
                field,
                format!("must be between {} and {} characters", min, max),
            );
        }
        self
    }

    pub fn positive(&mut self, field: &'static str, value: f64) -> &mut Self {
        if value.is_nan() || value.is_infinite() || value <= 0.0 {
            self.push(field, "must be greater than zero");
        }
        self
    }

    pub fn non_negative(&mut self, field: &'static str, value: i64) -> &mut Self {
        if value < 0 {
            self.push(field, "must not be negative");
        }
        self
    }

    pub fn non_empty<T>(&mut self, field: &'static str, value: &[T]) -> &mut Self {
        if value.is_empty() {
            self.push(field, "must not be empty");
        }
        self
    }

    pub fn finish(&mut self) -> std::result::Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.errors)))
        }
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

// ============= Extractor =============

/// JSON body extractor that decodes and then validates the payload.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::InvalidInput(format!("unable to read request body: {}", e))
            }
        })?;

        let payload: T = decode_json(&body)?;
        payload.validate()?;

        Ok(ValidatedJson(payload))
    }
}
