//! Error types for the comparison harness.

use thiserror::Error;

/// Misuse of the harness or comparator.
///
/// Every variant is a caller bug rather than a data condition: the run is
/// rejected before anything is measured or reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// A run was requested with zero iterations.
    #[error("{label}: iteration count must be at least 1")]
    ZeroIterations {
        /// Label of the rejected run.
        label: String,
    },

    /// The compared grids do not have the same shape.
    #[error(
        "shape mismatch: reference is {}x{}, candidate is {}x{}",
        .reference.0, .reference.1, .candidate.0, .candidate.1
    )]
    ShapeMismatch {
        /// `(rows, cols)` of the reference grid.
        reference: (usize, usize),
        /// `(rows, cols)` of the candidate grid.
        candidate: (usize, usize),
    },

    /// Tolerance was negative, infinite or NaN.
    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f32),

    /// Median kernel size was even or zero.
    #[error("median kernel size must be odd and at least 1, got {0}")]
    InvalidKernelSize(usize),

    /// Median kernel window does not fit in memory.
    #[error("median kernel size {0} is too large")]
    KernelTooLarge(usize),

    /// Grid shape overflows the addressable element count.
    #[error("grid shape {rows}x{cols} is too large")]
    ShapeTooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// Grid storage does not match the declared shape.
    #[error("grid data has {len} elements, expected {rows}x{cols}")]
    DataLength {
        /// Declared rows.
        rows: usize,
        /// Declared columns.
        cols: usize,
        /// Actual element count.
        len: usize,
    },
}

/// A specialized [`Result`] type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
