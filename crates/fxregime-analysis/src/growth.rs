//! Period growth statistics for a single indicator.
//!
//! Compares an indicator's level at two dates on the panel axis and
//! normalizes by the month span, so periods of different length compare
//! fairly on monthly average growth.

use crate::error::{AnalysisError, Result};
use chrono::{Datelike, NaiveDate};
use fxregime_panel::Panel;
use serde::{Deserialize, Serialize};

/// Growth of one indicator over a closed `[start, end]` period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthStats {
    /// Indicator analyzed.
    pub column: String,
    /// Period start (inclusive; must be on the panel axis).
    pub start: NaiveDate,
    /// Period end (inclusive; must be on the panel axis).
    pub end: NaiveDate,
    /// Level at the start date.
    pub start_value: f64,
    /// Level at the end date.
    pub end_value: f64,
    /// Absolute change, `end_value − start_value`.
    pub increase: f64,
    /// Percentage change over the period.
    pub pct_increase: f64,
    /// Whole months between the boundary dates.
    pub months: i32,
    /// Percentage change divided by the month span.
    pub monthly_avg_rate: f64,
}

/// Difference between two periods' growth profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthComparison {
    /// The period under investigation.
    pub current: GrowthStats,
    /// The reference period.
    pub reference: GrowthStats,
    /// `current − reference` monthly average growth, in percentage points.
    pub monthly_rate_diff: f64,
    /// Whether monthly average growth accelerated in the current period.
    pub accelerated: bool,
}

impl GrowthComparison {
    /// Compare a period under investigation against a reference period.
    pub fn between(current: GrowthStats, reference: GrowthStats) -> Self {
        let monthly_rate_diff = current.monthly_avg_rate - reference.monthly_avg_rate;
        Self {
            accelerated: monthly_rate_diff > 0.0,
            current,
            reference,
            monthly_rate_diff,
        }
    }
}

/// Compute growth statistics for one panel column between two axis dates.
///
/// Both boundary dates must be present on the axis; an absent date is a
/// typed error naming the date, never a silent nearest-match.
pub fn period_growth(
    panel: &Panel,
    column: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<GrowthStats> {
    let values = panel.column(column)?;
    let start_value = value_at(panel, values, column, start)?;
    let end_value = value_at(panel, values, column, end)?;

    let months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    if months <= 0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "growth period must span at least one month (got {start} to {end})"
        )));
    }

    let increase = end_value - start_value;
    let pct_increase = if start_value == 0.0 {
        f64::NAN
    } else {
        increase / start_value * 100.0
    };

    Ok(GrowthStats {
        column: column.to_string(),
        start,
        end,
        start_value,
        end_value,
        increase,
        pct_increase,
        months,
        monthly_avg_rate: pct_increase / months as f64,
    })
}

fn value_at(panel: &Panel, values: &[f64], column: &str, date: NaiveDate) -> Result<f64> {
    panel
        .dates()
        .iter()
        .position(|&d| d == date)
        .map(|i| values[i])
        .ok_or_else(|| AnalysisError::MissingDate {
            column: column.to_string(),
            date,
        })
}
