//! Error types for panel construction and regime splitting.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors that can occur while building or slicing a panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// No common dates survived the inner join.
    #[error("Inner join produced no common dates across indicators: {}", indicators.join(", "))]
    EmptyJoin {
        /// Indicators that participated in the join.
        indicators: Vec<String>,
    },

    /// No series loaded at all.
    #[error("No series available to build a panel")]
    NoSeries,

    /// A referenced column does not exist in the panel.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A column already exists under this name.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column's length does not match the date axis.
    #[error("Column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Offending column name.
        column: String,
        /// Expected row count (length of the date axis).
        expected: usize,
        /// Actual value count.
        actual: usize,
    },

    /// A regime's boundaries are inverted or degenerate.
    #[error("Invalid regime {name:?}: start {start} is not before end {end}")]
    InvalidRegime {
        /// Regime name.
        name: String,
        /// Configured inclusive start.
        start: NaiveDate,
        /// Configured exclusive end.
        end: NaiveDate,
    },

    /// Two regimes overlap in a configuration that requires disjointness.
    #[error("Regimes {first:?} and {second:?} overlap")]
    OverlappingRegimes {
        /// Earlier regime by start date.
        first: String,
        /// Later regime by start date.
        second: String,
    },
}
