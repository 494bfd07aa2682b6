//! Panel construction from loaded series.
//!
//! The builder folds the loaded series together with a pairwise inner join
//! on the date axis, in declaration order, then appends derived indicators.
//! Skipped sources and skipped derivations are surfaced as warnings; only a
//! join that leaves no common dates is an error.

use crate::derived::DerivedIndicator;
use crate::error::{PanelError, Result};
use crate::panel::{Column, Panel};
use chrono::NaiveDate;
use fxregime_data::{LoadOutcome, MonthlySeries};

/// A built panel together with the warnings accumulated on the way.
#[derive(Debug)]
pub struct PanelBuild {
    /// The aligned panel.
    pub panel: Panel,
    /// Human-readable warnings (skipped sources, skipped derivations).
    pub warnings: Vec<String>,
}

/// Builds a [`Panel`] from load outcomes and derived-indicator definitions.
pub struct PanelBuilder {
    series: Vec<MonthlySeries>,
    warnings: Vec<String>,
    derived: Vec<Box<dyn DerivedIndicator>>,
}

impl std::fmt::Debug for PanelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelBuilder")
            .field("series", &self.series.len())
            .field("warnings", &self.warnings)
            .field("derived", &self.derived.len())
            .finish()
    }
}

impl Default for PanelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            warnings: Vec::new(),
            derived: Vec::new(),
        }
    }

    /// Seed the builder from loader outcomes, in declaration order.
    ///
    /// Skipped outcomes become warnings; the panel is built from whatever
    /// subset loaded.
    pub fn from_outcomes(outcomes: Vec<LoadOutcome>) -> Self {
        let mut builder = Self::new();
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Loaded(series) => builder.series.push(series),
                LoadOutcome::Skipped { name, reason } => {
                    builder.warnings.push(format!("skipped {name}: {reason}"));
                }
            }
        }
        builder
    }

    /// Add one loaded series.
    pub fn add_series(mut self, series: MonthlySeries) -> Self {
        self.series.push(series);
        self
    }

    /// Register a derived indicator, computed after the join.
    pub fn with_derived(mut self, indicator: Box<dyn DerivedIndicator>) -> Self {
        self.derived.push(indicator);
        self
    }

    /// Names of the series that will participate in the join, in order.
    pub fn loaded_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name()).collect()
    }

    /// Build the panel.
    ///
    /// Errors with [`PanelError::NoSeries`] when nothing loaded and
    /// [`PanelError::EmptyJoin`] when the indicators share no dates; both
    /// are terminal for the run, unlike the per-source warnings.
    pub fn build(mut self) -> Result<PanelBuild> {
        if self.series.is_empty() {
            return Err(PanelError::NoSeries);
        }

        let axis = self.joined_axis();
        if axis.is_empty() {
            return Err(PanelError::EmptyJoin {
                indicators: self.series.iter().map(|s| s.name().to_string()).collect(),
            });
        }

        let columns = self
            .series
            .iter()
            .map(|series| Column {
                name: series.name().to_string(),
                // Every axis date is present in every series by construction
                values: axis
                    .iter()
                    .map(|&d| series.value_at(d).unwrap_or(f64::NAN))
                    .collect(),
            })
            .collect();

        let mut panel = Panel::new(axis, columns)?;

        for indicator in &self.derived {
            let missing: Vec<&str> = indicator
                .required_columns()
                .into_iter()
                .filter(|c| !panel.has_column(c))
                .collect();
            if !missing.is_empty() {
                self.warnings.push(format!(
                    "skipped derived {}: missing columns {}",
                    indicator.name(),
                    missing.join(", ")
                ));
                continue;
            }
            let values = indicator.compute(&panel)?;
            panel.add_column(indicator.name().to_string(), values)?;
        }

        Ok(PanelBuild {
            panel,
            warnings: self.warnings,
        })
    }

    /// Intersection of all series' date sets, ascending.
    ///
    /// Pairwise fold in declaration order; the axis only ever shrinks as
    /// more series are folded in.
    fn joined_axis(&self) -> Vec<NaiveDate> {
        let mut axis: Vec<NaiveDate> = self.series[0].observations().iter().map(|o| o.date).collect();
        for series in &self.series[1..] {
            axis.retain(|&d| series.value_at(d).is_some());
        }
        axis
    }
}
