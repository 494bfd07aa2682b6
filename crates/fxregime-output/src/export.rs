//! Export surface for regime analysis results.
//!
//! Every analysis artifact exports to CSV (flat, spreadsheet-friendly) and
//! JSON (compact or pretty) through a single [`Exporter`] trait. CSV layouts
//! are wide where the artifact is naturally tabular (matrices, attribution
//! tables) and one-record-per-row otherwise.

use fxregime_analysis::{
    AttributionTable, CorrelationMatrix, FitDiagnostics, GrowthComparison, GrowthStats,
    ImportanceRanking,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV buffer was not valid UTF-8.
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Anything that can serialize itself into an export format.
pub trait Exporter {
    /// Serialize into the requested format.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Serialize and write to a file.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let contents = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

fn csv_into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let buffer = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(buffer)?)
}

fn json_string<T: Serialize>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string(value)?),
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}

impl Exporter for CorrelationMatrix {
    /// CSV is the wide layout: one header column of labels, then one column
    /// per label, mirroring the symmetric matrix.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                let mut header = vec!["indicator".to_string()];
                header.extend(self.labels().iter().cloned());
                writer.write_record(&header)?;

                for (i, label) in self.labels().iter().enumerate() {
                    let mut record = vec![label.clone()];
                    record.extend(self.values().row(i).iter().map(|v| v.to_string()));
                    writer.write_record(&record)?;
                }
                csv_into_string(writer)
            }
            _ => json_string(self, format),
        }
    }
}

/// One feature's correlation-delta row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationDeltaRow {
    /// Feature name.
    pub feature: String,
    /// `after − before` correlation against the target.
    pub delta: f64,
}

/// Sorted between-regime correlation changes against one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationDeltaExport {
    /// Target column the deltas are measured against.
    pub target: String,
    /// Per-feature deltas, strongest increase first.
    pub rows: Vec<CorrelationDeltaRow>,
}

impl CorrelationDeltaExport {
    /// Wrap a sorted delta vector for export.
    pub fn new(target: &str, deltas: Vec<(String, f64)>) -> Self {
        Self {
            target: target.to_string(),
            rows: deltas
                .into_iter()
                .map(|(feature, delta)| CorrelationDeltaRow { feature, delta })
                .collect(),
        }
    }
}

impl Exporter for CorrelationDeltaExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for row in &self.rows {
                    writer.serialize(row)?;
                }
                csv_into_string(writer)
            }
            _ => json_string(self, format),
        }
    }
}

impl Exporter for ImportanceRanking {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for entry in self.entries() {
                    writer.serialize(entry)?;
                }
                csv_into_string(writer)
            }
            _ => json_string(self, format),
        }
    }
}

impl Exporter for AttributionTable {
    /// CSV is one row per evaluated observation: date, baseline, prediction,
    /// then one signed contribution column per feature.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                let mut header = vec![
                    "date".to_string(),
                    "baseline".to_string(),
                    "prediction".to_string(),
                ];
                header.extend(self.features().iter().cloned());
                writer.write_record(&header)?;

                for i in 0..self.n_rows() {
                    let mut record = vec![
                        self.dates()[i].to_string(),
                        self.baselines()[i].to_string(),
                        self.predictions()[i].to_string(),
                    ];
                    record.extend(self.contributions().row(i).iter().map(|v| v.to_string()));
                    writer.write_record(&record)?;
                }
                csv_into_string(writer)
            }
            _ => json_string(self, format),
        }
    }
}

impl Exporter for FitDiagnostics {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.serialize(self)?;
                csv_into_string(writer)
            }
            _ => json_string(self, format),
        }
    }
}

/// Flat CSV record for one period's growth statistics.
#[derive(Debug, Clone, Serialize)]
struct GrowthRecord<'a> {
    period: &'a str,
    column: &'a str,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    start_value: f64,
    end_value: f64,
    pct_increase: f64,
    months: i32,
    monthly_avg_rate: f64,
}

impl<'a> GrowthRecord<'a> {
    fn new(period: &'a str, stats: &'a GrowthStats) -> Self {
        Self {
            period,
            column: &stats.column,
            start: stats.start,
            end: stats.end,
            start_value: stats.start_value,
            end_value: stats.end_value,
            pct_increase: stats.pct_increase,
            months: stats.months,
            monthly_avg_rate: stats.monthly_avg_rate,
        }
    }
}

impl Exporter for GrowthComparison {
    /// CSV is two rows (current and reference periods); the rate difference
    /// is recoverable from the `monthly_avg_rate` column.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                writer.serialize(GrowthRecord::new("current", &self.current))?;
                writer.serialize(GrowthRecord::new("reference", &self.reference))?;
                csv_into_string(writer)
            }
            _ => json_string(self, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(ExportFormat::Csv, "csv")]
    #[case(ExportFormat::Json, "json")]
    #[case(ExportFormat::PrettyJson, "json")]
    fn test_extension(#[case] format: ExportFormat, #[case] expected: &str) {
        assert_eq!(format.extension(), expected);
    }

    #[test]
    fn test_delta_export_csv() {
        let export = CorrelationDeltaExport::new(
            "USD_KRW",
            vec![("SPREAD_10Y".to_string(), 0.8), ("M2_KOR".to_string(), -0.3)],
        );
        let csv = export.export_to_string(ExportFormat::Csv).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "feature,delta");
        assert_eq!(lines.next().unwrap(), "SPREAD_10Y,0.8");
        assert_eq!(lines.next().unwrap(), "M2_KOR,-0.3");
    }

    #[test]
    fn test_delta_export_json_roundtrip() {
        let export = CorrelationDeltaExport::new("USD_KRW", vec![("BOND_KOR".to_string(), 0.1)]);
        let json = export.export_to_string(ExportFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["target"], "USD_KRW");
        assert_eq!(parsed["rows"][0]["feature"], "BOND_KOR");
    }

    #[test]
    fn test_pretty_json_is_multiline() {
        let export = CorrelationDeltaExport::new("USD_KRW", vec![("CPI_KOR".to_string(), 0.2)]);
        let pretty = export.export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(pretty.contains('\n'));
    }
}
