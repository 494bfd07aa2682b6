//! Regime splitting over the panel's date axis.
//!
//! A regime is a named half-open interval `[start, end)`. The half-open
//! convention is what keeps adjacent regimes from double-counting a
//! boundary month: a row dated exactly `end` belongs to the next regime.

use crate::error::{PanelError, Result};
use crate::panel::Panel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named, half-open date interval supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Regime name (e.g. "normal", "anomaly").
    pub name: String,
    /// Inclusive start.
    pub start: NaiveDate,
    /// Exclusive end.
    pub end: NaiveDate,
}

impl RegimeConfig {
    /// Create a regime definition; fails if `start >= end`.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let name = name.into();
        if start >= end {
            return Err(PanelError::InvalidRegime { name, start, end });
        }
        Ok(Self { name, start, end })
    }

    /// Whether a date falls inside this regime.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// One regime's row subset plus diagnostics.
#[derive(Debug, Clone)]
pub struct RegimeSlice {
    /// Regime name.
    pub name: String,
    /// Configured boundaries.
    pub config: RegimeConfig,
    /// Row subset of the panel matching the interval.
    pub rows: Panel,
}

impl RegimeSlice {
    /// Number of matching rows.
    pub fn row_count(&self) -> usize {
        self.rows.n_rows()
    }

    /// Whether the regime matched no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest matched date (the empirical start, not the configured one).
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.rows.dates().first().copied()
    }

    /// Latest matched date (the empirical end, not the configured boundary).
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.rows.dates().last().copied()
    }
}

/// Split the panel into one slice per regime definition.
///
/// Regimes are independent filters: overlap and gaps between definitions
/// are permitted here. Callers that need strict configuration run
/// [`validate_disjoint`] first. An interval matching zero rows yields a
/// valid empty slice, never an error.
pub fn split_regimes(panel: &Panel, regimes: &[RegimeConfig]) -> Vec<RegimeSlice> {
    regimes
        .iter()
        .map(|config| {
            let indices: Vec<usize> = panel
                .dates()
                .iter()
                .enumerate()
                .filter(|&(_, &d)| config.contains(d))
                .map(|(i, _)| i)
                .collect();
            RegimeSlice {
                name: config.name.clone(),
                config: config.clone(),
                rows: panel.take_rows(&indices),
            }
        })
        .collect()
}

/// Validate that regime definitions are well-formed and pairwise disjoint.
pub fn validate_disjoint(regimes: &[RegimeConfig]) -> Result<()> {
    for regime in regimes {
        if regime.start >= regime.end {
            return Err(PanelError::InvalidRegime {
                name: regime.name.clone(),
                start: regime.start,
                end: regime.end,
            });
        }
    }
    let mut sorted: Vec<&RegimeConfig> = regimes.iter().collect();
    sorted.sort_by_key(|r| r.start);
    for pair in sorted.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(PanelError::OverlappingRegimes {
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
    }
    Ok(())
}
