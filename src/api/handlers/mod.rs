//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

use crate::types::{AppError, Result};

/// Cart checkout handler.
pub mod cart;
/// Product catalog handlers.
pub mod products;
/// Registration, login and user lookup handlers.
pub mod users;

/// Parses a path segment as a record id; anything non-numeric is a 400.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| AppError::InvalidInput(format!("invalid {} id: {}", entity, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42", "product").unwrap(), 42);

        let err = parse_id("invalid", "product").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m == "invalid product id: invalid"));
    }
}
