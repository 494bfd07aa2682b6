#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fxregime/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;
pub mod series;

pub use error::{DataError, Result};
pub use loader::{LoadOutcome, SeriesSource, load_series, load_sources};
pub use schema::SeriesSchema;
pub use series::{MonthlySeries, Observation};
