//! Pearson correlation matrices and between-regime deltas.

use crate::error::{AnalysisError, Result};
use fxregime_panel::Panel;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Labeled symmetric Pearson correlation matrix for one regime.
///
/// The diagonal is exactly 1. Entries involving a zero-variance column are
/// NaN: undefined correlations are surfaced, never coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Array2<f64>,
    degenerate: Vec<String>,
}

impl CorrelationMatrix {
    /// Column labels, in matrix order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The underlying matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Correlation between two labeled columns.
    pub fn get(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.values[[i, j]])
    }

    /// Labels whose column had zero variance in this regime.
    ///
    /// Recorded at construction from the column variances themselves, so a
    /// healthy column is never implicated by a degenerate partner. These
    /// columns produce NaN entries everywhere off the diagonal.
    pub fn degenerate_columns(&self) -> Vec<&str> {
        self.degenerate.iter().map(String::as_str).collect()
    }

    /// Correlations of every other column against `target`, unsorted.
    pub fn target_correlations(&self, target: &str) -> Result<Vec<(String, f64)>> {
        let t = self.index_of(target)?;
        Ok(self
            .labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t)
            .map(|(i, label)| (label.clone(), self.values[[t, i]]))
            .collect())
    }

    fn index_of(&self, label: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| AnalysisError::Panel(fxregime_panel::PanelError::UnknownColumn(label.to_string())))
    }
}

/// Pearson correlation coefficient of two equal-length slices.
///
/// Returns NaN when either side has zero variance (undefined correlation).
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    if x.is_empty() {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Whether a series has zero variance, under the same squared-deviation
/// accumulation [`pearson`] uses for its NaN decision.
fn zero_variance(x: &[f64]) -> bool {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    x.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() == 0.0
}

/// Compute the full pairwise correlation matrix over the given columns of a
/// regime's rows.
///
/// Errors on an empty panel; a constant column inside the regime yields NaN
/// entries rather than failing the whole matrix.
pub fn correlation_matrix(panel: &Panel, columns: &[String]) -> Result<CorrelationMatrix> {
    if panel.is_empty() {
        return Err(AnalysisError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let n = columns.len();
    let series: Vec<&[f64]> = columns
        .iter()
        .map(|c| panel.column(c))
        .collect::<std::result::Result<_, _>>()?;

    let mut values = Array2::zeros((n, n));
    for i in 0..n {
        values[[i, i]] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(series[i], series[j]);
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }

    let degenerate = columns
        .iter()
        .zip(&series)
        .filter(|(_, s)| zero_variance(s))
        .map(|(label, _)| label.clone())
        .collect();

    Ok(CorrelationMatrix {
        labels: columns.to_vec(),
        values,
        degenerate,
    })
}

/// Change in target correlation between two regimes: `after − before` per
/// feature, self-entry dropped, sorted descending.
///
/// This ranks which relationships strengthened most between the regimes.
/// NaN deltas (a column degenerate in either regime) sort last.
pub fn correlation_delta(
    before: &CorrelationMatrix,
    after: &CorrelationMatrix,
    target: &str,
) -> Result<Vec<(String, f64)>> {
    let base = before.target_correlations(target)?;
    let mut deltas = Vec::with_capacity(base.len());
    for (label, r_before) in base {
        let r_after = after.get(target, &label)?;
        deltas.push((label, r_after - r_before));
    }
    deltas.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or_else(|| a.1.is_nan().cmp(&b.1.is_nan()))
    });
    Ok(deltas)
}
