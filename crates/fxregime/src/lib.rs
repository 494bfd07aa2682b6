#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fxregime/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;

// Re-export main types from sub-crates
pub use fxregime_analysis as analysis;
pub use fxregime_data as data;
pub use fxregime_output as output;
pub use fxregime_panel as panel;

// Re-export the standard configuration surface
pub use catalog::{IndicatorCatalog, IndicatorSource, default_regimes};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
