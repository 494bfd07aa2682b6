//! Error types for standardized series loading.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading a standardized series.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File header does not match the declared schema
    #[error("Schema mismatch in {file}: expected columns [{expected}], found [{found}]")]
    SchemaMismatch {
        /// File that was read
        file: String,
        /// Columns the schema declares
        expected: String,
        /// Columns found in the header
        found: String,
    },

    /// A date cell could not be parsed
    #[error("Unparseable date {value:?} in {file} (row {row})")]
    ParseDate {
        /// File that was read
        file: String,
        /// One-based data row number
        row: usize,
        /// Raw cell contents
        value: String,
    },

    /// A value cell could not be parsed as a number
    #[error("Unparseable value {value:?} in {file} (row {row})")]
    ParseValue {
        /// File that was read
        file: String,
        /// One-based data row number
        row: usize,
        /// Raw cell contents
        value: String,
    },

    /// The same observation date appears more than once
    #[error("Duplicate date {date} in {file}")]
    DuplicateDate {
        /// File that was read
        file: String,
        /// The repeated date
        date: chrono::NaiveDate,
    },

    /// The file contains no data rows
    #[error("No observations in {0}")]
    Empty(String),
}
