//! Size limits for client input
//!
//! This module defines configurable limits that the type inference engine
//! enforces while it walks a client value. Violations result in
//! `LimitError`s, surfaced as `Error::LimitExceeded`.
//!
//! ## Contract
//!
//! The defaults are generous enough for any real CDF variable; they exist to
//! reject runaway nesting and pathological inputs before any buffer is
//! allocated. Custom limits can be set through the configuration file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size limits for client input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting depth of sequences (default: 32)
    pub max_nesting_depth: usize,

    /// Maximum number of leaf elements in one value (default: 256M)
    pub max_elements: usize,

    /// Maximum encoded length of a single string in bytes (default: 16MB)
    pub max_string_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_nesting_depth: 32,
            max_elements: 256 * 1024 * 1024,
            max_string_bytes: 16 * 1024 * 1024, // 16MB
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    ///
    /// This is useful for unit tests that need to test limit enforcement
    /// without creating extremely large values.
    pub fn with_small_limits() -> Self {
        Limits {
            max_nesting_depth: 4,
            max_elements: 100,
            max_string_bytes: 64,
        }
    }

    /// Validate a nesting depth reached while walking a value
    pub fn check_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                actual: depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }

    /// Validate the number of leaf elements of a value
    pub fn check_elements(&self, count: usize) -> Result<(), LimitError> {
        if count > self.max_elements {
            return Err(LimitError::TooManyElements {
                actual: count,
                max: self.max_elements,
            });
        }
        Ok(())
    }

    /// Validate the encoded length of one string
    pub fn check_string(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_string_bytes {
            return Err(LimitError::StringTooLong {
                actual: len,
                max: self.max_string_bytes,
            });
        }
        Ok(())
    }
}

/// Limit validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    /// Value nesting exceeds maximum depth
    #[error("Nesting too deep: {actual} levels exceeds maximum {max}")]
    NestingTooDeep {
        /// Actual nesting depth
        actual: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Value holds more leaf elements than allowed
    #[error("Too many elements: {actual} exceeds maximum {max}")]
    TooManyElements {
        /// Actual element count
        actual: usize,
        /// Maximum allowed count
        max: usize,
    },

    /// A string is longer than allowed once encoded
    #[error("String too long: {actual} bytes exceeds maximum {max}")]
    StringTooLong {
        /// Actual encoded length
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },
}

impl LimitError {
    /// Short reason code, stable across releases
    pub fn reason_code(&self) -> &'static str {
        match self {
            LimitError::NestingTooDeep { .. } => "nesting_too_deep",
            LimitError::TooManyElements { .. } => "too_many_elements",
            LimitError::StringTooLong { .. } => "string_too_long",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_at_max() {
        let limits = Limits::with_small_limits();
        assert!(limits.check_depth(limits.max_nesting_depth).is_ok());
    }

    #[test]
    fn test_depth_exceeds_max() {
        let limits = Limits::with_small_limits();
        let result = limits.check_depth(limits.max_nesting_depth + 1);
        assert!(matches!(result, Err(LimitError::NestingTooDeep { .. })));
    }

    #[test]
    fn test_elements_exceed_max() {
        let limits = Limits::with_small_limits();
        assert!(limits.check_elements(100).is_ok());
        let result = limits.check_elements(101);
        assert!(matches!(
            result,
            Err(LimitError::TooManyElements { actual: 101, max: 100 })
        ));
    }

    #[test]
    fn test_string_exceeds_max() {
        let limits = Limits::with_small_limits();
        assert!(limits.check_string(64).is_ok());
        assert!(matches!(
            limits.check_string(65),
            Err(LimitError::StringTooLong { .. })
        ));
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(
            LimitError::NestingTooDeep { actual: 1, max: 0 }.reason_code(),
            "nesting_too_deep"
        );
        assert_eq!(
            LimitError::TooManyElements { actual: 1, max: 0 }.reason_code(),
            "too_many_elements"
        );
        assert_eq!(
            LimitError::StringTooLong { actual: 1, max: 0 }.reason_code(),
            "string_too_long"
        );
    }

    #[test]
    fn test_default_limits_deserialize_partial() {
        let limits: Limits = serde_json::from_str(r#"{"max_nesting_depth": 8}"#).unwrap();
        assert_eq!(limits.max_nesting_depth, 8);
        assert_eq!(limits.max_elements, Limits::default().max_elements);
    }
}
