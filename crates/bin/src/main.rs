//! fxregime CLI binary.
//!
//! Command-line interface for the regime-comparison analytics pipeline.

mod integration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fxregime::IndicatorCatalog;
use fxregime::catalog::THEORETICAL_FWD;
use fxregime_analysis::{
    ExplainerConfig, ForestConfig, component_contributions, correlation_delta,
    correlation_matrix, explain_forest, fit_diagnostics, fit_importance, period_growth,
    GrowthComparison,
};
use fxregime_data::{SeriesSchema, SeriesSource, load_sources};
use fxregime_output::{
    ComparisonSummary, CorrelationDeltaExport, ExportFormat, Exporter, RegimeDigest,
    ReportBuilder,
};
use fxregime_panel::{Panel, PanelBuilder, RegimeSlice, split_regimes};
use indicatif::{ProgressBar, ProgressStyle};
use integration::data_pipeline::{load_panel, print_warnings, regimes};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fxregime")]
#[command(about = "Regime-comparison analytics for macro exchange-rate drivers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by every panel-building subcommand.
#[derive(Args)]
struct DataArgs {
    /// Root directory of the standardized CSV tree
    #[arg(long)]
    data_root: PathBuf,

    /// Target indicator column
    #[arg(long, default_value = "USD_KRW")]
    target: String,

    /// First month of the anomaly regime (inclusive)
    #[arg(long, default_value = "2024-11-01")]
    cutoff: NaiveDate,

    /// End of the anomaly regime (exclusive)
    #[arg(long, default_value = "2026-02-01")]
    end: NaiveDate,
}

/// Model fitting arguments.
#[derive(Args)]
struct ModelArgs {
    /// Number of trees in the ensemble
    #[arg(long, default_value = "200")]
    trees: usize,

    /// Master seed for fitting and attribution
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Permutations sampled per attributed observation
    #[arg(long, default_value = "64")]
    permutations: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: correlation, importance, and attribution
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        model: ModelArgs,

        /// Directory to write result artifacts into
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Export format (csv, json, or pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Per-regime correlation matrices and the between-regime delta
    Correlation {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Feature-importance ranking from a forest fit on the normal regime
    Importance {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Per-observation attribution of the anomaly regime
    Attribution {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Rank which component series drove an aggregate's period increase
    Components {
        /// Root directory of the component CSV files
        #[arg(long)]
        data_root: PathBuf,

        /// Component source as NAME=RELATIVE_PATH (value column NAME); repeatable
        #[arg(long = "source", value_name = "NAME=PATH", required = true)]
        sources: Vec<String>,

        /// Start of the period (a panel month)
        #[arg(long)]
        start: NaiveDate,

        /// End of the period (a panel month)
        #[arg(long)]
        end: NaiveDate,

        /// Number of top contributors to print
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Growth statistics for one indicator over two periods
    Growth {
        /// Root directory of the standardized CSV tree
        #[arg(long)]
        data_root: PathBuf,

        /// Indicator column to analyze
        #[arg(long, default_value = "M2_KOR")]
        column: String,

        /// Start of the period under investigation (a panel month)
        #[arg(long)]
        start: NaiveDate,

        /// End of the period under investigation (a panel month)
        #[arg(long)]
        end: NaiveDate,

        /// Start of the reference period
        #[arg(long)]
        ref_start: NaiveDate,

        /// End of the reference period
        #[arg(long)]
        ref_end: NaiveDate,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            data,
            model,
            export_dir,
            format,
        } => analyze(&data, &model, export_dir.as_deref(), &format),
        Commands::Correlation { data } => correlation(&data),
        Commands::Importance { data, model } => importance(&data, &model),
        Commands::Attribution { data, model } => attribution(&data, &model),
        Commands::Components {
            data_root,
            sources,
            start,
            end,
            top,
        } => components(&data_root, &sources, start, end, top),
        Commands::Growth {
            data_root,
            column,
            start,
            end,
            ref_start,
            ref_end,
        } => growth(&data_root, &column, start, end, ref_start, ref_end),
    }
}

/// Load the panel behind a progress bar and print accumulated warnings.
fn load_with_progress(data_root: &Path) -> Result<Panel, Box<dyn std::error::Error>> {
    let catalog = IndicatorCatalog::standard();
    let pb = ProgressBar::new(catalog.sources().len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let build = match load_panel(data_root, Some(&pb)) {
        Ok(build) => {
            pb.finish_with_message(format!(
                "{} indicators, {} aligned months",
                build.panel.column_names().len(),
                build.panel.n_rows()
            ));
            build
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e);
        }
    };
    print_warnings(&build.warnings);
    Ok(build.panel)
}

/// Split the panel and require both regimes to be non-empty.
fn split_two(
    panel: &Panel,
    data: &DataArgs,
) -> Result<Vec<RegimeSlice>, Box<dyn std::error::Error>> {
    let configs = regimes(data.cutoff, data.end)?;
    let slices = split_regimes(panel, &configs);
    for slice in &slices {
        if slice.is_empty() {
            return Err(format!(
                "regime '{}' matched no panel rows ([{}, {}))",
                slice.name, slice.config.start, slice.config.end
            )
            .into());
        }
    }
    Ok(slices)
}

/// Feature columns present in the panel (skipped sources drop out).
fn available_features(panel: &Panel) -> Vec<String> {
    IndicatorCatalog::standard()
        .feature_columns()
        .into_iter()
        .filter(|c| panel.has_column(c))
        .collect()
}

fn parse_format(format: &str) -> Result<ExportFormat, Box<dyn std::error::Error>> {
    match format.to_lowercase().as_str() {
        "csv" => Ok(ExportFormat::Csv),
        "json" => Ok(ExportFormat::Json),
        "pretty-json" => Ok(ExportFormat::PrettyJson),
        other => Err(format!("unknown export format: {other} (expected csv, json, or pretty-json)").into()),
    }
}

fn analyze(
    data: &DataArgs,
    model: &ModelArgs,
    export_dir: Option<&Path>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = parse_format(format)?;
    let panel = load_with_progress(&data.data_root)?;
    let slices = split_two(&panel, data)?;
    let features = available_features(&panel);

    let mut columns = vec![data.target.clone()];
    columns.extend(features.iter().cloned());

    let before = correlation_matrix(&slices[0].rows, &columns)?;
    let after = correlation_matrix(&slices[1].rows, &columns)?;
    let delta = correlation_delta(&before, &after, &data.target)?;

    let forest_config = ForestConfig {
        n_trees: model.trees,
        seed: model.seed,
        ..Default::default()
    };
    let (forest, ranking) = fit_importance(&slices[0].rows, &data.target, &features, forest_config)?;
    let table = explain_forest(
        &forest,
        &slices[0].rows,
        &slices[1].rows,
        &features,
        ExplainerConfig {
            n_permutations: model.permutations,
            seed: model.seed,
        },
    )?;

    let mut summary = ComparisonSummary::new(&data.target)
        .with_regimes(slices.iter().map(RegimeDigest::from_slice).collect())
        .with_correlation_delta(delta.clone())
        .with_importance(
            ranking
                .entries()
                .iter()
                .map(|e| (e.feature.clone(), e.score))
                .collect(),
        )
        .with_attribution_impact(table.mean_abs_impact());

    if panel.has_column(THEORETICAL_FWD) {
        summary = summary.with_fit(fit_diagnostics(&panel, &data.target, THEORETICAL_FWD)?);
    }

    println!("{}", summary.to_ascii_table());

    for degenerate in before.degenerate_columns() {
        eprintln!("warning: '{degenerate}' is constant in the normal regime");
    }
    for degenerate in after.degenerate_columns() {
        eprintln!("warning: '{degenerate}' is constant in the anomaly regime");
    }

    if let Some(dir) = export_dir {
        std::fs::create_dir_all(dir)?;
        let ext = format.extension();

        before.export_to_file(&dir.join(format!("correlation_normal.{ext}")), format)?;
        after.export_to_file(&dir.join(format!("correlation_anomaly.{ext}")), format)?;
        CorrelationDeltaExport::new(&data.target, delta)
            .export_to_file(&dir.join(format!("correlation_delta.{ext}")), format)?;
        ranking.export_to_file(&dir.join(format!("importance.{ext}")), format)?;
        table.export_to_file(&dir.join(format!("attribution.{ext}")), format)?;

        let mut report = ReportBuilder::new()
            .target(&data.target)
            .regime("normal")
            .regime("anomaly")
            .section("summary", &summary)?
            .section("importance", &ranking)?;
        if let Some(fit) = &summary.fit {
            report = report.section("forward_fit", fit)?;
        }
        report.build().write_to(&dir.join("report.json"))?;

        println!("Artifacts written to {}", dir.display());
    }

    Ok(())
}

fn correlation(data: &DataArgs) -> Result<(), Box<dyn std::error::Error>> {
    let panel = load_with_progress(&data.data_root)?;
    let slices = split_two(&panel, data)?;
    let features = available_features(&panel);

    let mut columns = vec![data.target.clone()];
    columns.extend(features.iter().cloned());

    let before = correlation_matrix(&slices[0].rows, &columns)?;
    let after = correlation_matrix(&slices[1].rows, &columns)?;

    println!("\nNormal regime correlation matrix:\n");
    print!("{}", before.export_to_string(ExportFormat::Csv)?);
    println!("\nAnomaly regime correlation matrix:\n");
    print!("{}", after.export_to_string(ExportFormat::Csv)?);

    println!("\nCorrelation change vs {} (after - before):\n", data.target);
    for (feature, delta) in correlation_delta(&before, &after, &data.target)? {
        println!("  {feature:<20} {delta:>+9.4}");
    }
    Ok(())
}

fn importance(data: &DataArgs, model: &ModelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let panel = load_with_progress(&data.data_root)?;
    let slices = split_two(&panel, data)?;
    let features = available_features(&panel);

    let forest_config = ForestConfig {
        n_trees: model.trees,
        seed: model.seed,
        ..Default::default()
    };
    let (_, ranking) = fit_importance(&slices[0].rows, &data.target, &features, forest_config)?;

    println!(
        "\nFeature importance for {} (fit on '{}', {} trees, seed {}):\n",
        data.target,
        slices[0].name,
        model.trees,
        model.seed
    );
    for entry in ranking.entries() {
        println!("  {:<20} {:>9.4}", entry.feature, entry.score);
    }
    Ok(())
}

fn attribution(data: &DataArgs, model: &ModelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let panel = load_with_progress(&data.data_root)?;
    let slices = split_two(&panel, data)?;
    let features = available_features(&panel);

    let forest_config = ForestConfig {
        n_trees: model.trees,
        seed: model.seed,
        ..Default::default()
    };
    let (forest, _) = fit_importance(&slices[0].rows, &data.target, &features, forest_config)?;
    let table = explain_forest(
        &forest,
        &slices[0].rows,
        &slices[1].rows,
        &features,
        ExplainerConfig {
            n_permutations: model.permutations,
            seed: model.seed,
        },
    )?;

    println!(
        "\nMean |attribution| over '{}' ({} observations):\n",
        slices[1].name,
        table.n_rows()
    );
    for (feature, impact) in table.mean_abs_impact() {
        println!("  {feature:<20} {impact:>9.4}");
    }

    println!("\nPer-observation contributions:\n");
    print!("{}", table.export_to_string(ExportFormat::Csv)?);
    Ok(())
}

fn components(
    data_root: &Path,
    specs: &[String],
    start: NaiveDate,
    end: NaiveDate,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sources = Vec::with_capacity(specs.len());
    for spec in specs {
        let Some((name, relative)) = spec.split_once('=') else {
            return Err(format!("--source expects NAME=PATH, got {spec:?}").into());
        };
        sources.push(SeriesSource::new(
            name,
            data_root.join(relative),
            SeriesSchema::new(name),
        ));
    }

    let build = PanelBuilder::from_outcomes(load_sources(&sources)).build()?;
    print_warnings(&build.warnings);
    let names: Vec<String> = build
        .panel
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let breakdown = component_contributions(&build.panel, &names, start, end)?;

    println!(
        "\nComponent contributions, {} to {} (total increase {:+.1}):\n",
        breakdown.start, breakdown.end, breakdown.total_increase
    );
    for entry in breakdown.top(top) {
        println!(
            "  {:<40} {:>+12.1} ({:>5.1}%)",
            entry.component, entry.increase, entry.share_pct
        );
    }
    Ok(())
}

fn growth(
    data_root: &Path,
    column: &str,
    start: NaiveDate,
    end: NaiveDate,
    ref_start: NaiveDate,
    ref_end: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let panel = load_with_progress(data_root)?;

    let current = period_growth(&panel, column, start, end)?;
    let reference = period_growth(&panel, column, ref_start, ref_end)?;
    let comparison = GrowthComparison::between(current, reference);

    println!("\nGrowth: {column}\n");
    for (label, stats) in [
        ("current", &comparison.current),
        ("reference", &comparison.reference),
    ] {
        println!(
            "  {:<10} {} to {}: {:+.2}% over {} months ({:+.3}%/month)",
            label, stats.start, stats.end, stats.pct_increase, stats.months, stats.monthly_avg_rate
        );
    }
    println!(
        "\n  monthly rate difference: {:+.3} pp ({})",
        comparison.monthly_rate_diff,
        if comparison.accelerated {
            "accelerated"
        } else {
            "decelerated"
        }
    );
    Ok(())
}
