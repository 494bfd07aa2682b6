//! Per-observation feature attribution for out-of-regime rows.
//!
//! The explainer is model-agnostic: it works through a prediction closure
//! and a background matrix (the training regime's features). For each
//! evaluated row it averages marginal contributions over seeded random
//! feature permutations, each walked from a sampled background row to the
//! evaluated row. Every permutation telescopes exactly from the background
//! prediction to the row prediction, so with the baseline defined as the
//! mean prediction of the sampled background rows,
//! `baseline + Σ contributions == prediction` holds to floating-point
//! tolerance by construction.

use crate::dataset::feature_matrix;
use crate::error::{AnalysisError, Result};
use crate::forest::RandomForestRegressor;
use chrono::NaiveDate;
use fxregime_panel::Panel;
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Explainer configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExplainerConfig {
    /// Permutations sampled per evaluated row (default: 64).
    pub n_permutations: usize,
    /// Master seed; each row derives its own stream (default: 42).
    pub seed: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            n_permutations: 64,
            seed: 42,
        }
    }
}

/// Signed per-observation, per-feature contributions for one evaluated
/// regime, plus the per-row baseline and model prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionTable {
    features: Vec<String>,
    dates: Vec<NaiveDate>,
    baselines: Vec<f64>,
    predictions: Vec<f64>,
    /// rows × features
    contributions: Array2<f64>,
}

impl AttributionTable {
    /// Feature names, in column order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Evaluated row dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Per-row baseline (expected prediction over the sampled background).
    pub fn baselines(&self) -> &[f64] {
        &self.baselines
    }

    /// Per-row model prediction.
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Signed contributions, rows × features.
    pub fn contributions(&self) -> &Array2<f64> {
        &self.contributions
    }

    /// Number of evaluated rows.
    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    /// Mean absolute contribution per feature, sorted descending.
    ///
    /// The sign-independent answer to "which inputs pushed the target the
    /// most during this regime".
    pub fn mean_abs_impact(&self) -> Vec<(String, f64)> {
        let n_rows = self.contributions.nrows().max(1) as f64;
        let mut impact: Vec<(String, f64)> = self
            .features
            .iter()
            .enumerate()
            .map(|(j, feature)| {
                let total: f64 = self.contributions.column(j).iter().map(|v| v.abs()).sum();
                (feature.clone(), total / n_rows)
            })
            .collect();
        impact.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        impact
    }
}

/// Model-agnostic permutation explainer over a prediction closure.
pub struct PermutationExplainer<'a, F>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
{
    predict: F,
    background: &'a Array2<f64>,
    features: Vec<String>,
    config: ExplainerConfig,
}

impl<F> std::fmt::Debug for PermutationExplainer<'_, F>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationExplainer")
            .field("background_rows", &self.background.nrows())
            .field("features", &self.features)
            .field("config", &self.config)
            .finish()
    }
}

impl<'a, F> PermutationExplainer<'a, F>
where
    F: Fn(ArrayView1<'_, f64>) -> f64,
{
    /// Create an explainer over a prediction closure and background rows.
    pub fn new(
        predict: F,
        background: &'a Array2<f64>,
        features: Vec<String>,
        config: ExplainerConfig,
    ) -> Result<Self> {
        if background.nrows() == 0 {
            return Err(AnalysisError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if background.ncols() != features.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: features.len(),
                actual: background.ncols(),
            });
        }
        if config.n_permutations == 0 {
            return Err(AnalysisError::InvalidParameter(
                "n_permutations must be positive".to_string(),
            ));
        }
        Ok(Self {
            predict,
            background,
            features,
            config,
        })
    }

    /// Explain every row of a feature matrix.
    ///
    /// `dates` labels the rows (one per matrix row).
    pub fn explain_rows(
        &self,
        rows: &Array2<f64>,
        dates: &[NaiveDate],
    ) -> Result<AttributionTable> {
        if rows.nrows() != dates.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: rows.nrows(),
                actual: dates.len(),
            });
        }
        if rows.ncols() != self.features.len() {
            return Err(AnalysisError::DimensionMismatch {
                expected: self.features.len(),
                actual: rows.ncols(),
            });
        }

        let n_features = self.features.len();
        let n_rows = rows.nrows();
        let mut contributions = Array2::zeros((n_rows, n_features));
        let mut baselines = Vec::with_capacity(n_rows);
        let mut predictions = Vec::with_capacity(n_rows);

        for (i, row) in rows.rows().into_iter().enumerate() {
            let (baseline, row_contributions) = self.explain_one(row, i as u64);
            for (j, v) in row_contributions.iter().enumerate() {
                contributions[[i, j]] = *v;
            }
            baselines.push(baseline);
            predictions.push((self.predict)(row));
        }

        Ok(AttributionTable {
            features: self.features.clone(),
            dates: dates.to_vec(),
            baselines,
            predictions,
            contributions,
        })
    }

    /// Average marginal contributions for one row over sampled permutations.
    fn explain_one(&self, row: ArrayView1<'_, f64>, row_index: u64) -> (f64, Vec<f64>) {
        let n_features = self.features.len();
        // Per-row stream so tables are identical run to run regardless of
        // how many rows are evaluated.
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(row_index));

        let mut contributions = vec![0.0; n_features];
        let mut baseline_total = 0.0;
        let mut order: Vec<usize> = (0..n_features).collect();

        for _ in 0..self.config.n_permutations {
            let bg_idx = rng.gen_range(0..self.background.nrows());
            let mut current: Array1<f64> = self.background.row(bg_idx).to_owned();
            let mut pred_before = (self.predict)(current.view());
            baseline_total += pred_before;

            order.shuffle(&mut rng);
            for &feature in &order {
                current[feature] = row[feature];
                let pred_after = (self.predict)(current.view());
                contributions[feature] += pred_after - pred_before;
                pred_before = pred_after;
            }
        }

        let scale = self.config.n_permutations as f64;
        for contribution in &mut contributions {
            *contribution /= scale;
        }
        (baseline_total / scale, contributions)
    }
}

/// Explain a fitted forest's predictions on an evaluation regime, using the
/// training regime's feature rows as background.
///
/// The caller guarantees the two regimes are disjoint when the intent is
/// out-of-regime explanation; this function does not re-check.
pub fn explain_forest(
    forest: &RandomForestRegressor,
    training: &Panel,
    evaluation: &Panel,
    features: &[String],
    config: ExplainerConfig,
) -> Result<AttributionTable> {
    if evaluation.is_empty() {
        return Err(AnalysisError::EmptyRegime("evaluation".to_string()));
    }
    let background = feature_matrix(training, features)?;
    let rows = feature_matrix(evaluation, features)?;

    let predict = |row: ArrayView1<'_, f64>| {
        // Dimension checks ran at matrix construction; a fitted forest
        // cannot fail on a well-shaped row.
        forest.predict_row(row).unwrap_or(f64::NAN)
    };
    let explainer = PermutationExplainer::new(predict, &background, features.to_vec(), config)?;
    explainer.explain_rows(&rows, evaluation.dates())
}
