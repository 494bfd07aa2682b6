//! CSV loading of standardized series files.
//!
//! Loading never decides failure policy: each source resolves to a
//! [`LoadOutcome`], either the parsed series or a skip reason, and the
//! caller chooses between best-effort and fail-fast handling.

use crate::error::{DataError, Result};
use crate::schema::SeriesSchema;
use crate::series::{MonthlySeries, Observation};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Date format emitted by the upstream normalization step.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One declared source: indicator name, file location, and column schema.
#[derive(Debug, Clone)]
pub struct SeriesSource {
    /// Indicator name the series carries in the panel.
    pub name: String,
    /// Path of the standardized CSV file.
    pub path: PathBuf,
    /// Declared column layout of the file.
    pub schema: SeriesSchema,
}

impl SeriesSource {
    /// Declare a source.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, schema: SeriesSchema) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            schema,
        }
    }
}

/// Result of attempting to load one source.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The source parsed cleanly.
    Loaded(MonthlySeries),
    /// The source was skipped; the panel is built without it.
    Skipped {
        /// Indicator name of the skipped source.
        name: String,
        /// Human-readable reason, naming the file and cause.
        reason: String,
    },
}

impl LoadOutcome {
    /// The loaded series, if any.
    pub fn series(&self) -> Option<&MonthlySeries> {
        match self {
            Self::Loaded(series) => Some(series),
            Self::Skipped { .. } => None,
        }
    }

    /// Indicator name this outcome refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Loaded(series) => series.name(),
            Self::Skipped { name, .. } => name,
        }
    }
}

/// Load a single standardized series file against its declared schema.
pub fn load_series(name: &str, path: &Path, schema: &SeriesSchema) -> Result<MonthlySeries> {
    let file_label = path.display().to_string();
    let mut reader = csv::Reader::from_path(path)?;

    let header = reader.headers()?.clone();
    let columns: Vec<&str> = header.iter().map(str::trim).collect();
    let Some((date_idx, value_idx)) = schema.match_header(&columns) else {
        return Err(DataError::SchemaMismatch {
            file: file_label,
            expected: format!("{}, {}", schema.date_column, schema.value_column),
            found: columns.join(", "),
        });
    };

    let mut observations = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_idx + 1;

        let raw_date = record.get(date_idx).unwrap_or("").trim();
        let date = parse_date(raw_date).ok_or_else(|| DataError::ParseDate {
            file: file_label.clone(),
            row,
            value: raw_date.to_string(),
        })?;

        let raw_value = record.get(value_idx).unwrap_or("").trim();
        let value = parse_value(raw_value).ok_or_else(|| DataError::ParseValue {
            file: file_label.clone(),
            row,
            value: raw_value.to_string(),
        })?;

        observations.push(Observation::new(date, value));
    }

    MonthlySeries::from_observations(name, observations, &file_label)
}

/// Load every declared source, converting per-source failures into
/// [`LoadOutcome::Skipped`] values.
///
/// Outcomes are returned in declaration order so downstream joins are
/// deterministic regardless of how callers schedule the IO.
pub fn load_sources(sources: &[SeriesSource]) -> Vec<LoadOutcome> {
    sources
        .iter()
        .map(|source| {
            match load_series(&source.name, &source.path, &source.schema) {
                Ok(series) => LoadOutcome::Loaded(series),
                Err(err) => LoadOutcome::Skipped {
                    name: source.name.clone(),
                    reason: err.to_string(),
                },
            }
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Parse a numeric cell, tolerating thousands-separator commas.
fn parse_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("1380.5", Some(1380.5))]
    #[case("-0.25", Some(-0.25))]
    #[case("3,914,213.9", Some(3_914_213.9))]
    #[case("n/a", None)]
    #[case("", None)]
    fn test_parse_value(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_value(raw), expected);
    }

    #[test]
    fn test_parse_date_format() {
        assert_eq!(
            parse_date("2024-11-01"),
            NaiveDate::from_ymd_opt(2024, 11, 1)
        );
        assert_eq!(parse_date("11/01/2024"), None);
    }
}
