//! Standard indicator catalog and default regime configuration.
//!
//! Everything here is configuration, not behavior: the engines never read
//! these tables directly. The catalog fixes the indicator declaration order
//! so the panel join (and therefore every downstream result) is
//! deterministic, and the default regime boundaries are plain constructors
//! the CLI can override.

use chrono::NaiveDate;
use fxregime_data::{SeriesSchema, SeriesSource};
use fxregime_panel::RegimeConfig;
use std::path::Path;

/// Target indicator analyzed by the standard pipeline.
pub const TARGET: &str = "USD_KRW";

/// Name of the derived 10-year sovereign yield spread.
pub const SPREAD_10Y: &str = "SPREAD_10Y";

/// Name of the derived covered-interest-parity forward.
pub const THEORETICAL_FWD: &str = "THEORETICAL_FWD";

/// Korean policy-rate level, the domestic leg of the parity forward.
pub const BASE_RATE_KOR: &str = "BASE_RATE_KOR";

/// US policy-rate level, the foreign leg of the parity forward.
pub const FED_FUNDS: &str = "FEDFUNDS";

/// The cutoff where the standard regime split places the break.
pub fn anomaly_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 1).expect("valid constant date")
}

/// Exclusive end of the standard anomaly window.
pub fn anomaly_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid constant date")
}

/// One catalog entry: indicator name, file location under the data root,
/// and the file's declared column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSource {
    /// Indicator name carried into the panel.
    pub name: &'static str,
    /// File path relative to the data root.
    pub relative_path: &'static str,
    /// Name of the value column inside the file.
    pub value_column: &'static str,
}

/// Ordered catalog of the standard indicator set.
///
/// Declaration order is load and join order. The target comes first, then
/// the raw drivers; derived indicators are not files and live in
/// [`Self::derived`]-adjacent configuration on the pipeline side.
#[derive(Debug, Clone)]
pub struct IndicatorCatalog {
    sources: Vec<IndicatorSource>,
}

impl Default for IndicatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl IndicatorCatalog {
    /// The standard USD/KRW macro indicator set.
    pub fn standard() -> Self {
        Self {
            sources: vec![
                IndicatorSource {
                    name: "USD_KRW",
                    relative_path: "exchange_rate/exchange_rate_processed.csv",
                    value_column: "USD_KRW",
                },
                IndicatorSource {
                    name: "SPREAD_POLICY",
                    relative_path: "policy_rate/spread_KOR_USA_processed.csv",
                    value_column: "SPREAD_POLICY",
                },
                IndicatorSource {
                    name: BASE_RATE_KOR,
                    relative_path: "policy_rate/KOR/base_rate_KOR_processed.csv",
                    value_column: "BASE_RATE_KOR",
                },
                IndicatorSource {
                    name: FED_FUNDS,
                    relative_path: "policy_rate/USA/FEDFUNDS.csv",
                    value_column: "FEDFUNDS",
                },
                IndicatorSource {
                    name: "BOND_KOR",
                    relative_path: "10y_bond/KOR/10y_bond_KOR_processed.csv",
                    value_column: "BOND_KOR",
                },
                IndicatorSource {
                    name: "BOND_USA",
                    relative_path: "10y_bond/USA/GS10.csv",
                    value_column: "GS10",
                },
                IndicatorSource {
                    name: "M2_KOR",
                    relative_path: "m2/KOR/M2_KOR_processed.csv",
                    value_column: "M2_KOR",
                },
                IndicatorSource {
                    name: "M2_USA",
                    relative_path: "m2/USA/M2SL.csv",
                    value_column: "M2SL",
                },
                IndicatorSource {
                    name: "CPI_KOR",
                    relative_path: "CPI/KOR/CPI_KOR_processed.csv",
                    value_column: "CPI_KOR",
                },
                IndicatorSource {
                    name: "CPI_USA",
                    relative_path: "CPI/USA/CPIAUCSL.csv",
                    value_column: "CPIAUCSL",
                },
                IndicatorSource {
                    name: "IPI_KOR",
                    relative_path: "production_index/KOR/IPI_KOR_processed.csv",
                    value_column: "IPI_KOR",
                },
                IndicatorSource {
                    name: "IPI_USA",
                    relative_path: "production_index/USA/INDPRO.csv",
                    value_column: "INDPRO",
                },
            ],
        }
    }

    /// Catalog entries, in declaration order.
    pub fn sources(&self) -> &[IndicatorSource] {
        &self.sources
    }

    /// Indicator names, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name).collect()
    }

    /// Look up one entry by indicator name.
    pub fn get(&self, name: &str) -> Option<&IndicatorSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Resolve the catalog against a data root into loadable declarations.
    pub fn series_sources(&self, data_root: &Path) -> Vec<SeriesSource> {
        self.sources
            .iter()
            .map(|source| {
                SeriesSource::new(
                    source.name,
                    data_root.join(source.relative_path),
                    SeriesSchema::new(source.value_column),
                )
            })
            .collect()
    }

    /// Model feature columns: raw drivers with the bond levels collapsed
    /// into the derived yield spread and the policy-rate levels collapsed
    /// into `SPREAD_POLICY`. The target and the forward are never features.
    pub fn feature_columns(&self) -> Vec<String> {
        [
            "SPREAD_POLICY",
            SPREAD_10Y,
            "M2_KOR",
            "M2_USA",
            "CPI_KOR",
            "CPI_USA",
            "IPI_KOR",
            "IPI_USA",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
    }
}

/// The standard two-regime split: everything before the cutoff is
/// `normal`, the window from the cutoff to the configured end is `anomaly`.
pub fn default_regimes() -> Vec<RegimeConfig> {
    vec![
        RegimeConfig::new("normal", NaiveDate::MIN, anomaly_cutoff())
            .expect("constant boundaries are ordered"),
        RegimeConfig::new("anomaly", anomaly_cutoff(), anomaly_end())
            .expect("constant boundaries are ordered"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_stable() {
        let catalog = IndicatorCatalog::standard();
        let names = catalog.names();
        assert_eq!(names[0], "USD_KRW");
        assert_eq!(names.len(), 12);
        // Paired country series stay adjacent
        assert_eq!(names[6], "M2_KOR");
        assert_eq!(names[7], "M2_USA");
    }

    #[test]
    fn test_series_sources_join_data_root() {
        let catalog = IndicatorCatalog::standard();
        let sources = catalog.series_sources(Path::new("/data"));
        assert_eq!(sources.len(), 12);
        assert_eq!(
            sources[5].path,
            Path::new("/data/10y_bond/USA/GS10.csv")
        );
        assert_eq!(sources[5].schema.value_column, "GS10");
    }

    #[rstest::rstest]
    #[case(BASE_RATE_KOR, "policy_rate/KOR/base_rate_KOR_processed.csv", "BASE_RATE_KOR")]
    #[case(FED_FUNDS, "policy_rate/USA/FEDFUNDS.csv", "FEDFUNDS")]
    #[case("M2_USA", "m2/USA/M2SL.csv", "M2SL")]
    fn test_catalog_lookup(
        #[case] name: &str,
        #[case] relative_path: &str,
        #[case] value_column: &str,
    ) {
        let catalog = IndicatorCatalog::standard();
        let source = catalog.get(name).unwrap();
        assert_eq!(source.relative_path, relative_path);
        assert_eq!(source.value_column, value_column);
    }

    #[test]
    fn test_features_exclude_target_and_forward() {
        let features = IndicatorCatalog::standard().feature_columns();
        assert!(!features.contains(&TARGET.to_string()));
        assert!(!features.contains(&THEORETICAL_FWD.to_string()));
        assert!(features.contains(&SPREAD_10Y.to_string()));
        assert!(!features.contains(&"BOND_KOR".to_string()));
        // Policy-rate levels enter only through SPREAD_POLICY and the forward
        assert!(!features.contains(&BASE_RATE_KOR.to_string()));
        assert!(!features.contains(&FED_FUNDS.to_string()));
    }

    #[test]
    fn test_default_regimes_are_contiguous_at_cutoff() {
        let regimes = default_regimes();
        assert_eq!(regimes[0].end, regimes[1].start);
        assert!(fxregime_panel::validate_disjoint(&regimes).is_ok());
        assert!(regimes[1].contains(anomaly_cutoff()));
        assert!(!regimes[0].contains(anomaly_cutoff()));
    }
}
