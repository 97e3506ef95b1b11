//! Error types for catplot operations.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing plot input or estimating statistics.
///
/// Every variant signals malformed caller input and is raised before any
/// partial result is produced. Degenerate data (empty groups, missing hue
/// levels, too few points for an interval) is never an error; it degrades to
/// NaN sentinels so a partial plot can still render.
#[derive(Error, Debug)]
pub enum Error {
    /// Hue grouping requires a long-form `x` or `y` variable.
    #[error("cannot use `hue` without `x` or `y`")]
    HueWithoutAxes,

    /// Explicit ordering only works on labeled tables.
    #[error("input data must be a labeled table to reorder")]
    ReorderRequiresTable,

    /// Wide-form arrays are limited to two dimensions.
    #[error("input `data` can have no more than 2 dimensions (got {ndim})")]
    UnsupportedShape {
        /// Number of dimensions in the rejected input.
        ndim: usize,
    },

    /// A column reference did not resolve against the input data.
    #[error("could not interpret input '{name}'")]
    UnresolvedColumn {
        /// The reference that failed to resolve.
        name: String,
    },

    /// Long-form grouping needs at least one numeric axis.
    #[error("neither the `x` nor `y` variable appears to be numeric")]
    NoNumericAxis,

    /// Long-form variables must have the same number of rows.
    #[error("data length mismatch: expected {expected} rows, got {actual}")]
    LengthMismatch {
        /// Row count of the value variable.
        expected: usize,
        /// Row count of the mismatched variable.
        actual: usize,
    },

    /// Confidence level must lie strictly between 0 and 100.
    #[error("confidence level must be in (0, 100), got {level}")]
    InvalidCiLevel {
        /// The rejected level.
        level: f64,
    },
}
