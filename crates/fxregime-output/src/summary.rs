//! Human-readable summary of a regime comparison run.
//!
//! Collects the per-regime row counts, the strongest correlation shifts, the
//! importance and attribution rankings, and the optional forward-fit and
//! growth sections into one terminal-friendly rendering.

use chrono::NaiveDate;
use fxregime_analysis::{FitDiagnostics, GrowthComparison};
use fxregime_panel::RegimeSlice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coverage digest for one regime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegimeDigest {
    /// Regime name.
    pub name: String,

    /// Configured start (inclusive).
    pub start: NaiveDate,

    /// Configured end (exclusive).
    pub end: NaiveDate,

    /// Observations that actually fell inside the window.
    pub rows: usize,

    /// First covered month, if the regime is non-empty.
    pub first: Option<NaiveDate>,

    /// Last covered month, if the regime is non-empty.
    pub last: Option<NaiveDate>,
}

impl RegimeDigest {
    /// Digest a split regime slice.
    pub fn from_slice(slice: &RegimeSlice) -> Self {
        Self {
            name: slice.name.clone(),
            start: slice.config.start,
            end: slice.config.end,
            rows: slice.row_count(),
            first: slice.min_date(),
            last: slice.max_date(),
        }
    }
}

/// Full summary of one regime-comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Target indicator.
    pub target: String,

    /// Per-regime coverage, in configuration order.
    pub regimes: Vec<RegimeDigest>,

    /// Correlation deltas against the target, strongest increase first.
    pub correlation_delta: Vec<(String, f64)>,

    /// Feature-importance scores, highest first.
    pub importance: Vec<(String, f64)>,

    /// Mean absolute attribution impact per feature, highest first.
    pub attribution_impact: Vec<(String, f64)>,

    /// Forward-fit diagnostics, when a reference column was analyzed.
    pub fit: Option<FitDiagnostics>,

    /// Growth comparison, when one was requested.
    pub growth: Option<GrowthComparison>,
}

impl ComparisonSummary {
    /// Create an empty summary for a target.
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            regimes: Vec::new(),
            correlation_delta: Vec::new(),
            importance: Vec::new(),
            attribution_impact: Vec::new(),
            fit: None,
            growth: None,
        }
    }

    /// Set the regime digests.
    pub fn with_regimes(mut self, regimes: Vec<RegimeDigest>) -> Self {
        self.regimes = regimes;
        self
    }

    /// Set the correlation deltas.
    pub fn with_correlation_delta(mut self, delta: Vec<(String, f64)>) -> Self {
        self.correlation_delta = delta;
        self
    }

    /// Set the importance scores.
    pub fn with_importance(mut self, importance: Vec<(String, f64)>) -> Self {
        self.importance = importance;
        self
    }

    /// Set the attribution impact ranking.
    pub fn with_attribution_impact(mut self, impact: Vec<(String, f64)>) -> Self {
        self.attribution_impact = impact;
        self
    }

    /// Set the forward-fit diagnostics.
    pub fn with_fit(mut self, fit: FitDiagnostics) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Set the growth comparison.
    pub fn with_growth(mut self, growth: GrowthComparison) -> Self {
        self.growth = Some(growth);
        self
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nRegime Comparison: {}\n", self.target));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str("\nRegime Coverage:\n");
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>7} {:>12} {:>12}\n",
            "Regime", "Start", "End (excl)", "Rows", "First", "Last"
        ));
        for regime in &self.regimes {
            output.push_str(&format!(
                "{:<12} {:>12} {:>12} {:>7} {:>12} {:>12}\n",
                regime.name,
                regime.start.to_string(),
                regime.end.to_string(),
                regime.rows,
                regime
                    .first
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
                regime
                    .last
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
            ));
        }

        if !self.correlation_delta.is_empty() {
            output.push_str("\nCorrelation Change vs Target:\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for (feature, delta) in &self.correlation_delta {
                output.push_str(&format!("  {feature:<20} {delta:>+9.4}\n"));
            }
        }

        if !self.importance.is_empty() {
            output.push_str("\nFeature Importance (training regime):\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for (feature, score) in &self.importance {
                output.push_str(&format!("  {feature:<20} {score:>9.4}\n"));
            }
        }

        if !self.attribution_impact.is_empty() {
            output.push_str("\nMean |Attribution| (evaluated regime):\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for (feature, impact) in &self.attribution_impact {
                output.push_str(&format!("  {feature:<20} {impact:>9.4}\n"));
            }
        }

        if let Some(fit) = &self.fit {
            output.push_str("\nForward Fit:\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            output.push_str(&format!("  R²:              {:>9.4}\n", fit.r_squared));
            output.push_str(&format!("  Correlation:     {:>9.4}\n", fit.correlation));
            output.push_str(&format!("  Mean deviation:  {:>9.2}\n", fit.mean_deviation));
        }

        if let Some(growth) = &self.growth {
            output.push_str(&format!("\nGrowth: {}\n", growth.current.column));
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for (period, stats) in [
                ("current", &growth.current),
                ("reference", &growth.reference),
            ] {
                output.push_str(&format!(
                    "  {:<10} {} to {}: {:+.2}% over {} months ({:+.3}%/month)\n",
                    period,
                    stats.start,
                    stats.end,
                    stats.pct_increase,
                    stats.months,
                    stats.monthly_avg_rate,
                ));
            }
            output.push_str(&format!(
                "  monthly rate difference: {:+.3} pp ({})\n",
                growth.monthly_rate_diff,
                if growth.accelerated {
                    "accelerated"
                } else {
                    "decelerated"
                }
            ));
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Regime Comparison: {}\n\n", self.target));

        output.push_str("## Regime Coverage\n\n");
        output.push_str("| Regime | Start | End (excl) | Rows |\n");
        output.push_str("|--------|-------|------------|------|\n");
        for regime in &self.regimes {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                regime.name, regime.start, regime.end, regime.rows
            ));
        }
        output.push('\n');

        if !self.correlation_delta.is_empty() {
            output.push_str("## Correlation Change vs Target\n\n");
            output.push_str("| Feature | Delta |\n|---------|-------|\n");
            for (feature, delta) in &self.correlation_delta {
                output.push_str(&format!("| {feature} | {delta:+.4} |\n"));
            }
            output.push('\n');
        }

        if !self.importance.is_empty() {
            output.push_str("## Feature Importance\n\n");
            output.push_str("| Feature | Score |\n|---------|-------|\n");
            for (feature, score) in &self.importance {
                output.push_str(&format!("| {feature} | {score:.4} |\n"));
            }
            output.push('\n');
        }

        if !self.attribution_impact.is_empty() {
            output.push_str("## Mean Absolute Attribution\n\n");
            output.push_str("| Feature | Impact |\n|---------|--------|\n");
            for (feature, impact) in &self.attribution_impact {
                output.push_str(&format!("| {feature} | {impact:.4} |\n"));
            }
            output.push('\n');
        }

        if let Some(fit) = &self.fit {
            output.push_str("## Forward Fit\n\n");
            output.push_str(&format!("- **R²:** {:.4}\n", fit.r_squared));
            output.push_str(&format!("- **Correlation:** {:.4}\n", fit.correlation));
            output.push_str(&format!("- **Mean deviation:** {:.2}\n\n", fit.mean_deviation));
        }

        output
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Regime Comparison: {}", self.target)?;
        for regime in &self.regimes {
            writeln!(
                f,
                "  {}: [{}, {}) with {} rows",
                regime.name, regime.start, regime.end, regime.rows
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxregime_analysis::FitDiagnostics;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn digest(name: &str, rows: usize) -> RegimeDigest {
        RegimeDigest {
            name: name.to_string(),
            start: date(2024, 1),
            end: date(2024, 11),
            rows,
            first: Some(date(2024, 1)),
            last: Some(date(2024, 10)),
        }
    }

    fn summary() -> ComparisonSummary {
        ComparisonSummary::new("USD_KRW")
            .with_regimes(vec![digest("normal", 10), digest("anomaly", 4)])
            .with_correlation_delta(vec![
                ("SPREAD_10Y".to_string(), 0.9),
                ("M2_KOR".to_string(), -0.4),
            ])
            .with_importance(vec![("SPREAD_10Y".to_string(), 0.7)])
            .with_attribution_impact(vec![("SPREAD_10Y".to_string(), 12.5)])
            .with_fit(FitDiagnostics {
                r_squared: 0.85,
                correlation: 0.93,
                mean_deviation: 14.2,
            })
    }

    #[test]
    fn test_ascii_table_contains_sections() {
        let table = summary().to_ascii_table();
        assert!(table.contains("Regime Comparison: USD_KRW"));
        assert!(table.contains("normal"));
        assert!(table.contains("Correlation Change"));
        assert!(table.contains("SPREAD_10Y"));
        assert!(table.contains("Forward Fit"));
    }

    #[test]
    fn test_markdown_tables() {
        let md = summary().to_markdown();
        assert!(md.contains("# Regime Comparison: USD_KRW"));
        assert!(md.contains("| normal |"));
        assert!(md.contains("## Feature Importance"));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let table = ComparisonSummary::new("USD_KRW").to_ascii_table();
        assert!(!table.contains("Correlation Change"));
        assert!(!table.contains("Forward Fit"));
        assert!(!table.contains("Growth:"));
    }

    #[test]
    fn test_display_one_line_per_regime() {
        let text = format!("{}", summary());
        assert_eq!(text.lines().count(), 3);
    }
}
