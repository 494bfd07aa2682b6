//! Integration tests for standardized series loading.

use fxregime_data::{LoadOutcome, SeriesSchema, SeriesSource, load_series, load_sources};
use std::fs;
use std::path::PathBuf;

struct TempCsv {
    path: PathBuf,
}

impl TempCsv {
    fn write(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "fxregime_loader_{}_{}_{}",
            std::process::id(),
            name,
            contents.len()
        ));
        fs::write(&path, contents).unwrap();
        Self { path }
    }
}

impl Drop for TempCsv {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[test]
fn loads_well_formed_series() {
    let file = TempCsv::write(
        "rate",
        "observation_date,USD_KRW\n2024-01-01,1330.2\n2024-02-01,1340.8\n",
    );

    let series = load_series("USD_KRW", &file.path, &SeriesSchema::new("USD_KRW")).unwrap();
    assert_eq!(series.name(), "USD_KRW");
    assert_eq!(series.len(), 2);
    assert_eq!(series.observations()[0].value, 1330.2);
}

#[test]
fn strips_thousands_separators() {
    let file = TempCsv::write(
        "m2",
        "observation_date,M2_KOR\n2024-01-01,\"3,914,213.9\"\n",
    );

    let series = load_series("M2_KOR", &file.path, &SeriesSchema::new("M2_KOR")).unwrap();
    assert_eq!(series.observations()[0].value, 3_914_213.9);
}

#[test]
fn schema_mismatch_names_the_file() {
    let file = TempCsv::write("wrong", "observation_date,WRONG\n2024-01-01,1.0\n");

    let err = load_series("USD_KRW", &file.path, &SeriesSchema::new("USD_KRW")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Schema mismatch"));
    assert!(msg.contains("USD_KRW"));
    assert!(msg.contains("WRONG"));
}

#[test]
fn missing_file_becomes_skipped_outcome() {
    let sources = vec![SeriesSource::new(
        "CPI_KOR",
        "/nonexistent/cpi_kor.csv",
        SeriesSchema::new("CPI_KOR"),
    )];

    let outcomes = load_sources(&sources);
    assert_eq!(outcomes.len(), 1);
    match &outcomes[0] {
        LoadOutcome::Skipped { name, reason } => {
            assert_eq!(name, "CPI_KOR");
            assert!(!reason.is_empty());
        }
        LoadOutcome::Loaded(_) => panic!("expected skip for missing file"),
    }
}

#[test]
fn outcomes_preserve_declaration_order() {
    let good = TempCsv::write("good", "observation_date,A\n2024-01-01,1.0\n");
    let sources = vec![
        SeriesSource::new("MISSING", "/nonexistent/missing.csv", SeriesSchema::new("X")),
        SeriesSource::new("A", &good.path, SeriesSchema::new("A")),
    ];

    let outcomes = load_sources(&sources);
    assert_eq!(outcomes[0].name(), "MISSING");
    assert_eq!(outcomes[1].name(), "A");
    assert!(outcomes[1].series().is_some());
}

#[test]
fn malformed_value_row_is_an_error() {
    let file = TempCsv::write("bad", "observation_date,A\n2024-01-01,not_a_number\n");

    let err = load_series("A", &file.path, &SeriesSchema::new("A")).unwrap_err();
    assert!(err.to_string().contains("not_a_number"));
}
