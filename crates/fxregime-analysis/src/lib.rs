#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fxregime/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod attribution;
pub mod components;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod fit;
pub mod forest;
pub mod growth;
pub mod importance;
mod tree;

pub use attribution::{AttributionTable, ExplainerConfig, PermutationExplainer, explain_forest};
pub use components::{ComponentContribution, ContributionBreakdown, component_contributions};
pub use correlation::{CorrelationMatrix, correlation_delta, correlation_matrix, pearson};
pub use dataset::{feature_matrix, target_vector};
pub use error::{AnalysisError, Result};
pub use fit::{FitDiagnostics, fit_diagnostics};
pub use forest::{ForestConfig, MaxFeatures, RandomForestRegressor};
pub use growth::{GrowthComparison, GrowthStats, period_growth};
pub use importance::{ImportanceEntry, ImportanceRanking, fit_importance};
