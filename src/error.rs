//! Error types for grid construction and path queries.

use thiserror::Error;

/// Errors reported by grid construction and search setup.
///
/// Failing to find a path is not an error; see [SearchOutcome](crate::SearchOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Source data has zero or inconsistent dimensions.
    #[error("malformed input ({width}x{height}): {reason}")]
    MalformedInput {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    /// The goal does not pass the clearance test, so no search is attempted.
    #[error("goal ({x}, {y}) is blocked or lacks the required clearance")]
    InvalidGoal { x: f64, y: f64 },

    /// A configuration value is outside its accepted range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A cell write targeted a pixel outside the grid.
    #[error("pixel (row {row}, col {col}) is outside the grid")]
    OutOfBounds { row: i64, col: i64 },
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
