//! Error types for Rayo's checked operations
//!
//! The fast paths never fail: float exceptions become inf/NaN and
//! precondition breaches go undetected. These errors belong to the opt-in
//! checked variants (`from_slice`, `checked_div`, `try_normalized`,
//! `try_inverse`).

use thiserror::Error;

/// Result type for Rayo operations
pub type Result<T> = std::result::Result<T, RayoError>;

/// Errors reported by the checked operations
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RayoError {
    /// Slice too short for the vector arity
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Components required
        expected: usize,
        /// Components supplied
        actual: usize,
    },

    /// Integer division or remainder with a zero divisor lane
    #[error("Division by zero")]
    DivisionByZero,

    /// Zero-length or non-finite vector passed to normalization
    #[error("Degenerate vector: length is zero or not finite")]
    DegenerateVector,

    /// Matrix with zero or non-finite determinant
    #[error("Singular matrix: determinant {determinant}")]
    SingularMatrix {
        /// Determinant that failed the check, widened to f64
        determinant: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_error() {
        let err = RayoError::SizeMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Size mismatch: expected 3, got 2");
    }

    #[test]
    fn test_division_by_zero_error() {
        let err = RayoError::DivisionByZero;
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn test_degenerate_vector_error() {
        let err = RayoError::DegenerateVector;
        assert_eq!(
            err.to_string(),
            "Degenerate vector: length is zero or not finite"
        );
    }

    #[test]
    fn test_singular_matrix_error() {
        let err = RayoError::SingularMatrix { determinant: 0.0 };
        assert_eq!(err.to_string(), "Singular matrix: determinant 0");
    }

    #[test]
    fn test_error_equality() {
        let err1 = RayoError::SizeMismatch {
            expected: 4,
            actual: 1,
        };
        let err2 = RayoError::SizeMismatch {
            expected: 4,
            actual: 1,
        };
        assert_eq!(err1, err2);
        assert_ne!(err1, RayoError::DivisionByZero);
    }
}
