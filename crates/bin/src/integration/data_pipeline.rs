//! Load-and-assemble pipeline shared by the CLI subcommands.
//!
//! Loading is best-effort: a source that fails to parse is skipped with a
//! warning and the panel is built from whatever loaded. Only a join with no
//! common dates, or no loaded sources at all, is terminal.

use chrono::NaiveDate;
use fxregime::IndicatorCatalog;
use fxregime::catalog::{BASE_RATE_KOR, FED_FUNDS, SPREAD_10Y, TARGET, THEORETICAL_FWD};
use fxregime_data::{LoadOutcome, load_series};
use fxregime_panel::{
    PanelBuild, PanelBuilder, RateSpread, RegimeConfig, TheoreticalForward, validate_disjoint,
};
use indicatif::ProgressBar;
use std::error::Error;
use std::path::Path;

/// Load every catalog source under `data_root` and assemble the panel,
/// including the derived spread and theoretical forward.
///
/// Ticks `progress` once per source when given.
pub fn load_panel(
    data_root: &Path,
    progress: Option<&ProgressBar>,
) -> Result<PanelBuild, Box<dyn Error>> {
    let catalog = IndicatorCatalog::standard();
    let sources = catalog.series_sources(data_root);

    let mut outcomes = Vec::with_capacity(sources.len());
    for source in &sources {
        if let Some(pb) = progress {
            pb.set_message(source.name.clone());
        }
        let outcome = match load_series(&source.name, &source.path, &source.schema) {
            Ok(series) => LoadOutcome::Loaded(series),
            Err(err) => LoadOutcome::Skipped {
                name: source.name.clone(),
                reason: err.to_string(),
            },
        };
        outcomes.push(outcome);
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let build = PanelBuilder::from_outcomes(outcomes)
        .with_derived(Box::new(RateSpread::new(SPREAD_10Y, "BOND_KOR", "BOND_USA")))
        .with_derived(Box::new(TheoreticalForward::new(
            THEORETICAL_FWD,
            TARGET,
            BASE_RATE_KOR,
            FED_FUNDS,
        )))
        .build()?;
    Ok(build)
}

/// The two-regime split at `cutoff`, validated disjoint.
pub fn regimes(cutoff: NaiveDate, end: NaiveDate) -> Result<Vec<RegimeConfig>, Box<dyn Error>> {
    let configs = vec![
        RegimeConfig::new("normal", NaiveDate::MIN, cutoff)?,
        RegimeConfig::new("anomaly", cutoff, end)?,
    ];
    validate_disjoint(&configs)?;
    Ok(configs)
}

/// Print accumulated panel warnings to stderr.
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    struct TempRoot {
        path: PathBuf,
    }

    impl TempRoot {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "fxregime_pipeline_{}_{}",
                std::process::id(),
                name
            ));
            fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        fn write(&self, relative: &str, contents: &str) {
            let path = self.path.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    impl Drop for TempRoot {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn forward_derives_from_policy_rate_levels() {
        let root = TempRoot::new("policy_fwd");
        root.write(
            "exchange_rate/exchange_rate_processed.csv",
            "observation_date,USD_KRW\n2024-01-01,1300.0\n2024-02-01,1310.0\n",
        );
        root.write(
            "policy_rate/KOR/base_rate_KOR_processed.csv",
            "observation_date,BASE_RATE_KOR\n2024-01-01,3.5\n2024-02-01,3.5\n",
        );
        root.write(
            "policy_rate/USA/FEDFUNDS.csv",
            "observation_date,FEDFUNDS\n2024-01-01,5.33\n2024-02-01,5.33\n",
        );

        let build = load_panel(&root.path, None).unwrap();
        let panel = build.panel;

        // Parity forward comes from the policy-rate legs, which loaded even
        // though the bond files (the yield-spread inputs) are absent
        let spot = panel.column("USD_KRW").unwrap();
        let fwd = panel.column(THEORETICAL_FWD).unwrap();
        for (s, f) in spot.iter().zip(fwd) {
            let expected = s * 1.035 / 1.0533;
            assert!((f - expected).abs() < 1e-9);
        }
        assert!(!panel.has_column(SPREAD_10Y));
        assert!(build.warnings.iter().any(|w| w.contains(SPREAD_10Y)));
    }
}
