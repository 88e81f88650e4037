//! Error types for parmul operations.
//!
//! Every precondition the engine relies on (non-zero dimension, buffers of exactly
//! `size * size` elements, operands of matching dimension, a positive worker count)
//! is checked up front and reported through [`MatmulError`] before any buffer is
//! touched.

use std::fmt;

/// Errors that can occur while setting up a transpose or a multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatmulError {
    /// A matrix of dimension zero was supplied.
    ZeroDimension,
    /// `dim * dim` does not fit in `usize`.
    DimensionOverflow {
        /// The requested dimension.
        dim: usize,
    },
    /// A buffer does not hold exactly `dim * dim` elements.
    BufferSize {
        /// Which operand the buffer belongs to.
        operand: &'static str,
        /// The number of elements required.
        expected: usize,
        /// The number of elements supplied.
        actual: usize,
    },
    /// Operands passed to the same call disagree on their dimension.
    DimensionMismatch {
        /// Which operand disagrees.
        operand: &'static str,
        /// The dimension of the output matrix.
        expected: usize,
        /// The dimension of the offending operand.
        actual: usize,
    },
    /// The engine configuration is unusable.
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for MatmulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatmulError::ZeroDimension => write!(f, "Matrix dimension must be non-zero"),
            MatmulError::DimensionOverflow { dim } => {
                write!(f, "Matrix dimension {} overflows {}x{} elements", dim, dim, dim)
            }
            MatmulError::BufferSize {
                operand,
                expected,
                actual,
            } => write!(
                f,
                "Buffer size mismatch for {}: expected {} elements, got {}",
                operand, expected, actual
            ),
            MatmulError::DimensionMismatch {
                operand,
                expected,
                actual,
            } => write!(
                f,
                "Dimension mismatch for {}: expected {}x{}, got {}x{}",
                operand, expected, expected, actual, actual
            ),
            MatmulError::InvalidConfig { message } => {
                write!(f, "Invalid engine configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for MatmulError {}

/// Result type alias for parmul operations.
pub type Result<T> = std::result::Result<T, MatmulError>;

/// Creates a buffer size error.
pub fn buffer_size_error(operand: &'static str, expected: usize, actual: usize) -> MatmulError {
    MatmulError::BufferSize {
        operand,
        expected,
        actual,
    }
}

/// Creates a dimension mismatch error.
pub fn dimension_mismatch(operand: &'static str, expected: usize, actual: usize) -> MatmulError {
    MatmulError::DimensionMismatch {
        operand,
        expected,
        actual,
    }
}

/// Creates a configuration error.
pub fn config_error(message: impl Into<String>) -> MatmulError {
    MatmulError::InvalidConfig {
        message: message.into(),
    }
}

/// Returns the element count of a `dim x dim` matrix, rejecting zero and overflow.
pub fn checked_area(dim: usize) -> Result<usize> {
    if dim == 0 {
        return Err(MatmulError::ZeroDimension);
    }
    dim.checked_mul(dim)
        .ok_or(MatmulError::DimensionOverflow { dim })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_display() {
        let error = buffer_size_error("left", 16, 12);
        let display = format!("{}", error);
        assert!(display.contains("Buffer size mismatch"));
        assert!(display.contains("left"));
        assert!(display.contains("expected 16 elements"));
        assert!(display.contains("got 12"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let error = dimension_mismatch("right_transposed", 4, 5);
        let display = format!("{}", error);
        assert!(display.contains("Dimension mismatch"));
        assert!(display.contains("expected 4x4"));
        assert!(display.contains("got 5x5"));
    }

    #[test]
    fn test_config_error_display() {
        let error = config_error("worker count must be at least 1");
        let display = format!("{}", error);
        assert!(display.contains("Invalid engine configuration"));
        assert!(display.contains("worker count must be at least 1"));
    }

    #[test]
    fn test_checked_area() {
        assert_eq!(checked_area(1), Ok(1));
        assert_eq!(checked_area(7), Ok(49));
        assert_eq!(checked_area(0), Err(MatmulError::ZeroDimension));
        assert_eq!(
            checked_area(usize::MAX),
            Err(MatmulError::DimensionOverflow { dim: usize::MAX })
        );
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = MatmulError::ZeroDimension;

        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
