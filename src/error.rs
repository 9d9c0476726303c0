//! Error types shared by all matrix operations.
//!
//! Every fallible core operation returns [`MatrixError`]. There are only two
//! kinds of failure in the core: an operand or result with the wrong
//! dimensions, and an out-of-range 1-based cell access. Failures are
//! synchronous and fail only the call that raised them; an in-place
//! operation that fails midway makes no promise about which cells were
//! already written.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MatrixError>;

/// Errors raised by matrix construction, arithmetic, and convolution.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Operand or result dimensions do not satisfy the operation's shape
    /// precondition (mismatched arithmetic operands, a convolution core
    /// larger than its input, a reshape that changes the element count,
    /// incompatible matrix-product shapes).
    #[error("shape mismatch: expected {expected}, got {actual}")]
    Shape {
        /// Dimensions the operation required, e.g. `"2x3"`.
        expected: String,
        /// Dimensions actually supplied.
        actual: String,
    },

    /// A 1-based cell access outside `[1, rows] x [1, cols]`.
    #[error("index ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    Index {
        /// Requested 1-based row.
        row: usize,
        /// Requested 1-based column.
        col: usize,
        /// Rows in the matrix at the time of the access.
        rows: usize,
        /// Columns in the matrix at the time of the access.
        cols: usize,
    },
}
