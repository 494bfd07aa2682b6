//! Run report generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A report covering one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Target indicator the run analyzed.
    pub target: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Regime names covered by the run, in configuration order.
    pub regimes: Vec<String>,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl RunReport {
    /// Create a new report.
    pub fn new(target: String, regimes: Vec<String>, contents: serde_json::Value) -> Self {
        Self {
            target,
            timestamp: Utc::now(),
            regimes,
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to a file as pretty JSON.
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating run reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    target: Option<String>,
    regimes: Vec<String>,
    sections: serde_json::Map<String, serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target indicator.
    pub fn target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// Add a regime name.
    pub fn regime(mut self, name: &str) -> Self {
        self.regimes.push(name.to_string());
        self
    }

    /// Add a named, serializable section to the report contents.
    pub fn section<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self, ReportError> {
        self.sections
            .insert(name.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> RunReport {
        RunReport::new(
            self.target.unwrap_or_default(),
            self.regimes,
            serde_json::Value::Object(self.sections),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_creation() {
        let report = RunReport::new(
            "USD_KRW".to_string(),
            vec!["normal".to_string(), "anomaly".to_string()],
            serde_json::json!({"test": "data"}),
        );

        assert_eq!(report.target, "USD_KRW");
        assert_eq!(report.regimes.len(), 2);
    }

    #[test]
    fn test_report_builder_sections() {
        let report = ReportBuilder::new()
            .target("USD_KRW")
            .regime("normal")
            .regime("anomaly")
            .section("delta", &vec![("SPREAD_10Y", 0.5)])
            .unwrap()
            .build();

        assert_eq!(report.target, "USD_KRW");
        assert_eq!(report.regimes, vec!["normal", "anomaly"]);
        assert!(report.contents.get("delta").is_some());
    }

    #[test]
    fn test_to_json_roundtrip() {
        let report = ReportBuilder::new().target("USD_KRW").build();
        let json = report.to_json().unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.target, "USD_KRW");
    }
}
