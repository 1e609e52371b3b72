//! Error types for cdfkit
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every error is local to a single call: a failed mutation never leaves a
//! container in a partially updated state.

use crate::contract::ScalarType;
use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for cdfkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for value coercion and container mutation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Candidate scalar type is not accepted by the container's fixed type
    #[error("Type incompatibility: a {existing} container does not accept {candidate} values")]
    TypeIncompatibility {
        /// Type the container is fixed to
        existing: ScalarType,
        /// Type of the values that were offered
        candidate: ScalarType,
    },

    /// Buffer shape does not fit the container's declared shape
    #[error("Shape mismatch: container shape {expected:?} does not accept values of shape {actual:?}")]
    ShapeMismatch {
        /// Declared shape of the container
        expected: Vec<usize>,
        /// Shape of the offered buffer
        actual: Vec<usize>,
    },

    /// Structurally inconsistent or unsupported input
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Argument does not match what the operation requires
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A named variable or attribute already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A named variable, attribute or entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input exceeded a configured size limit
    #[error("Limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),
}

impl Error {
    /// Build a `MalformedInput` error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }

    /// Build an `InvalidArgument` error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Check if this is a type incompatibility
    pub fn is_type_incompatibility(&self) -> bool {
        matches!(self, Error::TypeIncompatibility { .. })
    }

    /// Check if this is a shape mismatch
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Error::ShapeMismatch { .. })
    }

    /// Check if this is a malformed input error
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_type_incompatibility() {
        let err = Error::TypeIncompatibility {
            existing: ScalarType::Double,
            candidate: ScalarType::Char,
        };
        let msg = err.to_string();
        assert!(msg.contains("Type incompatibility"));
        assert!(msg.contains("CDF_DOUBLE"));
        assert!(msg.contains("CDF_CHAR"));
    }

    #[test]
    fn test_error_display_shape_mismatch() {
        let err = Error::ShapeMismatch {
            expected: vec![1, 2, 2],
            actual: vec![5, 2, 2],
        };
        let msg = err.to_string();
        assert!(msg.contains("Shape mismatch"));
        assert!(msg.contains("[1, 2, 2]"));
        assert!(msg.contains("[5, 2, 2]"));
    }

    #[test]
    fn test_error_display_malformed() {
        let err = Error::malformed("ragged nested list");
        assert!(err.is_malformed_input());
        assert!(err.to_string().contains("ragged nested list"));
    }

    #[test]
    fn test_error_from_limit() {
        let err: Error = LimitError::NestingTooDeep { actual: 40, max: 32 }.into();
        assert!(matches!(err, Error::LimitExceeded(_)));
        assert!(err.to_string().contains("Limit exceeded"));
    }

    #[test]
    fn test_error_predicates() {
        let incompatible = Error::TypeIncompatibility {
            existing: ScalarType::Uint1,
            candidate: ScalarType::Int2,
        };
        assert!(incompatible.is_type_incompatibility());
        assert!(!incompatible.is_shape_mismatch());

        let shape = Error::ShapeMismatch {
            expected: vec![0, 3],
            actual: vec![3],
        };
        assert!(shape.is_shape_mismatch());
        assert!(!shape.is_malformed_input());
    }

    #[test]
    fn test_error_pattern_matching() {
        let err = Error::TypeIncompatibility {
            existing: ScalarType::Int1,
            candidate: ScalarType::Uint1,
        };

        match err {
            Error::TypeIncompatibility {
                existing,
                candidate,
            } => {
                assert_eq!(existing, ScalarType::Int1);
                assert_eq!(candidate, ScalarType::Uint1);
            }
            _ => panic!("Wrong error variant"),
        }
    }
}
