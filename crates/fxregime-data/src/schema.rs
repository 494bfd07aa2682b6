//! Declared schema for a standardized series file.
//!
//! Every source file carries exactly two columns: a month-granularity date
//! column and one named value column. The schema is declared per source and
//! validated against the file header at load time, rather than inferred
//! positionally from whatever the file happens to contain.

use serde::{Deserialize, Serialize};

/// Default name of the date column emitted by the upstream normalization step.
pub const DEFAULT_DATE_COLUMN: &str = "observation_date";

/// Declared column layout of one standardized series file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSchema {
    /// Name of the date column.
    pub date_column: String,
    /// Name of the single value column.
    pub value_column: String,
}

impl SeriesSchema {
    /// Create a schema with the default date column and the given value column.
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            value_column: value_column.into(),
        }
    }

    /// Create a schema with an explicit date column name.
    pub fn with_date_column(
        date_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            value_column: value_column.into(),
        }
    }

    /// Check a CSV header against this schema.
    ///
    /// Returns the `(date, value)` column indices when both declared columns
    /// are present.
    pub fn match_header(&self, header: &[&str]) -> Option<(usize, usize)> {
        let date_idx = header.iter().position(|c| *c == self.date_column)?;
        let value_idx = header.iter().position(|c| *c == self.value_column)?;
        Some((date_idx, value_idx))
    }
}
