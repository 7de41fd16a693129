//! # Validation Module
//!
//! Input validation utilities for the cart and checkout engine.
//!
//! Validation failures are local and recoverable: they surface as field- or
//! form-level messages and never abort the session.
//!
//! ## Usage
//! ```rust
//! use lumiere_core::validation::{validate_quantity, validate_required};
//!
//! validate_quantity(5).unwrap();
//! validate_required("fullName", "Linh Trần").unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - No upper bound here: stock limits are the catalog collaborator's
///   concern
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in đồng.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (gift items)
pub fn validate_unit_price(vnd: i64) -> ValidationResult<()> {
    if vnd < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a loyalty point amount.
///
/// ## Rules
/// - Must be non-negative (zero clears a redemption)
pub fn validate_points(points: i64) -> ValidationResult<()> {
    if points < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "points".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field.
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(())
}

/// Validates a phone number field.
///
/// ## Rules
/// - Must not be empty
/// - Must contain only digits, spaces, `+`, `-`, `.`, `(`, `)`
///
/// Deliberately loose: the storefront serves numbers written several ways
/// and the order service performs the authoritative check.
pub fn validate_phone(value: &str) -> ValidationResult<()> {
    validate_required("phone", value)?;

    let ok = value
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | ' ' | '(' | ')'));
    if !ok {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits and phone punctuation".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
