//! Goodness-of-fit diagnostics between the target and a reference column.
//!
//! Reports how well a reference series (the covered-interest-parity
//! forward) explains the observed target: R², Pearson correlation, and the
//! mean signed deviation in target units.

use crate::correlation::pearson;
use crate::error::{AnalysisError, Result};
use fxregime_panel::Panel;
use serde::{Deserialize, Serialize};

/// Diagnostics of a reference column against the observed target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    /// Coefficient of determination of the reference as a predictor.
    pub r_squared: f64,
    /// Pearson correlation between target and reference.
    pub correlation: f64,
    /// Mean of `target − reference`, in target units.
    pub mean_deviation: f64,
}

/// Compute fit diagnostics of `reference` against `target` over the panel.
pub fn fit_diagnostics(panel: &Panel, target: &str, reference: &str) -> Result<FitDiagnostics> {
    if panel.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let actual = panel.column(target)?;
    let predicted = panel.column(reference)?;

    let n = actual.len() as f64;
    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();

    let r_squared = if ss_tot == 0.0 {
        // Constant target: R² is undefined
        f64::NAN
    } else {
        1.0 - ss_res / ss_tot
    };

    let mean_deviation = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| a - p)
        .sum::<f64>()
        / n;

    Ok(FitDiagnostics {
        r_squared,
        correlation: pearson(actual, predicted),
        mean_deviation,
    })
}
