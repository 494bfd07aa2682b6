#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fxregime/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod derived;
pub mod error;
pub mod panel;
pub mod regime;

pub use builder::{PanelBuild, PanelBuilder};
pub use derived::{DerivedIndicator, RateSpread, TheoreticalForward};
pub use error::{PanelError, Result};
pub use panel::{Column, Panel};
pub use regime::{RegimeConfig, RegimeSlice, split_regimes, validate_disjoint};
