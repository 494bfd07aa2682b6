//! Error types for the analysis engines.

use chrono::NaiveDate;
use fxregime_panel::PanelError;
use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur inside the analysis engines.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The regime under analysis matched no rows.
    #[error("Regime {0:?} contains no rows; statistics skipped")]
    EmptyRegime(String),

    /// Not enough rows to run the requested computation.
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData {
        /// Required number of rows
        required: usize,
        /// Actual number of rows
        actual: usize,
    },

    /// Matrix or vector dimensions do not line up.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// A model method was called before fitting.
    #[error("Model has not been fitted")]
    NotFitted,

    /// Invalid engine parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A boundary date is absent from the panel's axis.
    #[error("Date {date} not present in column {column}")]
    MissingDate {
        /// Column being analyzed
        column: String,
        /// The absent date
        date: NaiveDate,
    },

    /// Underlying panel error (unknown column, etc.).
    #[error(transparent)]
    Panel(#[from] PanelError),
}
