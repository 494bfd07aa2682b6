//! Feature-importance ranking from a fitted forest.

use crate::dataset::{feature_matrix, target_vector};
use crate::error::Result;
use crate::forest::{ForestConfig, RandomForestRegressor};
use fxregime_panel::Panel;
use serde::{Deserialize, Serialize};

/// One feature's importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceEntry {
    /// Feature name.
    pub feature: String,
    /// Normalized importance in `[0, 1]`.
    pub score: f64,
}

/// Sorted, normalized feature-importance ranking from one fitted ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceRanking {
    entries: Vec<ImportanceEntry>,
}

impl ImportanceRanking {
    /// Build a ranking from per-feature scores, sorting descending.
    pub fn new(features: &[String], scores: &[f64]) -> Self {
        let mut entries: Vec<ImportanceEntry> = features
            .iter()
            .zip(scores)
            .map(|(feature, &score)| ImportanceEntry {
                feature: feature.clone(),
                score,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { entries }
    }

    /// Entries, highest score first.
    pub fn entries(&self) -> &[ImportanceEntry] {
        &self.entries
    }

    /// Top `k` entries.
    pub fn top(&self, k: usize) -> &[ImportanceEntry] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// Sum of all scores (1 for a non-degenerate fit, 0 for a constant target).
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.score).sum()
    }
}

/// Fit a forest on one regime's rows and rank the features' importance for
/// the target.
///
/// Importance is a property of the fitted model on its training rows; it is
/// never recomputed against another regime. The fitted forest is returned
/// alongside the ranking so the attribution engine can reuse it.
pub fn fit_importance(
    training: &Panel,
    target: &str,
    features: &[String],
    config: ForestConfig,
) -> Result<(RandomForestRegressor, ImportanceRanking)> {
    let x = feature_matrix(training, features)?;
    let y = target_vector(training, target)?;

    let mut forest = RandomForestRegressor::new(config)?;
    forest.fit(&x, &y)?;

    let scores = forest.feature_importances()?;
    let ranking = ImportanceRanking::new(features, &scores);
    Ok((forest, ranking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use fxregime_panel::Column;

    fn training_panel() -> Panel {
        let n = 48;
        let dates = (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, 1 + (i % 12) as u32, 1).unwrap()
            })
            .collect();
        let driver: Vec<f64> = (0..n).map(|i| (i as f64 * 0.9).sin() * 20.0).collect();
        let noise: Vec<f64> = (0..n).map(|i| ((i * 13 % 17) as f64) * 0.1).collect();
        let target: Vec<f64> = driver.iter().map(|d| 1300.0 + 3.0 * d).collect();
        Panel::new(
            dates,
            vec![
                Column {
                    name: "USD_KRW".into(),
                    values: target,
                },
                Column {
                    name: "DRIVER".into(),
                    values: driver,
                },
                Column {
                    name: "NOISE".into(),
                    values: noise,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ranking_sorted_and_normalized() {
        let features = vec!["DRIVER".to_string(), "NOISE".to_string()];
        let config = ForestConfig {
            n_trees: 30,
            ..Default::default()
        };
        let (_, ranking) = fit_importance(&training_panel(), "USD_KRW", &features, config).unwrap();

        assert_eq!(ranking.entries()[0].feature, "DRIVER");
        assert!(ranking.entries()[0].score > ranking.entries()[1].score);
        assert_relative_eq!(ranking.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_repeated_fit_identical_ranking() {
        let features = vec!["DRIVER".to_string(), "NOISE".to_string()];
        let config = ForestConfig {
            n_trees: 20,
            ..Default::default()
        };
        let panel = training_panel();
        let (_, a) = fit_importance(&panel, "USD_KRW", &features, config).unwrap();
        let (_, b) = fit_importance(&panel, "USD_KRW", &features, config).unwrap();
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_missing_target_is_error() {
        let features = vec!["DRIVER".to_string()];
        let result = fit_importance(
            &training_panel(),
            "NOT_A_COLUMN",
            &features,
            ForestConfig::default(),
        );
        assert!(result.is_err());
    }
}
