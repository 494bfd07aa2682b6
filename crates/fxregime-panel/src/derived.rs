//! Derived indicators computed from existing panel columns.
//!
//! Derivation runs strictly after the inner join, so every input value in a
//! row belongs to the same month. Implementations are pure row-wise
//! functions; they never filter rows.

use crate::error::Result;
use crate::panel::Panel;

/// A panel column computed from other panel columns.
pub trait DerivedIndicator {
    /// Name the computed column carries in the panel.
    fn name(&self) -> &str;

    /// Columns this derivation reads.
    fn required_columns(&self) -> Vec<&str>;

    /// Compute one value per panel row.
    fn compute(&self, panel: &Panel) -> Result<Vec<f64>>;
}

/// Row-wise difference of two rate columns (`minuend − subtrahend`).
///
/// Used for the 10-year sovereign yield spread (domestic minus foreign).
#[derive(Debug, Clone)]
pub struct RateSpread {
    name: String,
    minuend: String,
    subtrahend: String,
}

impl RateSpread {
    /// Declare a spread column.
    pub fn new(
        name: impl Into<String>,
        minuend: impl Into<String>,
        subtrahend: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            minuend: minuend.into(),
            subtrahend: subtrahend.into(),
        }
    }
}

impl DerivedIndicator for RateSpread {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![&self.minuend, &self.subtrahend]
    }

    fn compute(&self, panel: &Panel) -> Result<Vec<f64>> {
        let minuend = panel.column(&self.minuend)?;
        let subtrahend = panel.column(&self.subtrahend)?;
        Ok(minuend
            .iter()
            .zip(subtrahend)
            .map(|(a, b)| a - b)
            .collect())
    }
}

/// Covered-interest-parity forward rate: `spot × (1 + r_dom) / (1 + r_for)`.
///
/// Rate columns are quoted in percent (e.g. `3.50`), matching the
/// standardized policy-rate series; one-year tenor is assumed.
#[derive(Debug, Clone)]
pub struct TheoreticalForward {
    name: String,
    spot: String,
    domestic_rate: String,
    foreign_rate: String,
}

impl TheoreticalForward {
    /// Declare a theoretical forward column.
    pub fn new(
        name: impl Into<String>,
        spot: impl Into<String>,
        domestic_rate: impl Into<String>,
        foreign_rate: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            spot: spot.into(),
            domestic_rate: domestic_rate.into(),
            foreign_rate: foreign_rate.into(),
        }
    }
}

impl DerivedIndicator for TheoreticalForward {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![&self.spot, &self.domestic_rate, &self.foreign_rate]
    }

    fn compute(&self, panel: &Panel) -> Result<Vec<f64>> {
        let spot = panel.column(&self.spot)?;
        let r_dom = panel.column(&self.domestic_rate)?;
        let r_for = panel.column(&self.foreign_rate)?;
        Ok(spot
            .iter()
            .zip(r_dom)
            .zip(r_for)
            .map(|((s, rd), rf)| s * (1.0 + rd / 100.0) / (1.0 + rf / 100.0))
            .collect())
    }
}
