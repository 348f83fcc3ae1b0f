//! Assertions that fail the enclosing case.
//!
//! Unlike wait timeouts, assertion failures are never soft: they surface
//! as [`EsperarError::AssertionFailed`] and propagate out of the case body.

use crate::result::{EsperarError, EsperarResult};
use std::fmt::Debug;

/// Assert a condition holds
///
/// # Errors
///
/// Returns [`EsperarError::AssertionFailed`] with the given message
pub fn ensure(condition: bool, message: impl Into<String>) -> EsperarResult<()> {
    if condition {
        Ok(())
    } else {
        Err(EsperarError::AssertionFailed {
            message: message.into(),
        })
    }
}

/// Assert two values are equal
///
/// # Errors
///
/// Returns [`EsperarError::AssertionFailed`] naming both values
pub fn ensure_eq<T: PartialEq + Debug>(expected: &T, actual: &T, context: &str) -> EsperarResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EsperarError::AssertionFailed {
            message: format!("{context}: expected {expected:?}, got {actual:?}"),
        })
    }
}

/// Assert a string contains a substring
///
/// # Errors
///
/// Returns [`EsperarError::AssertionFailed`] naming both strings
pub fn ensure_contains(haystack: &str, needle: &str, context: &str) -> EsperarResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(EsperarError::AssertionFailed {
            message: format!("{context}: expected '{haystack}' to contain '{needle}'"),
        })
    }
}
