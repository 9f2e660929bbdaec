//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - installs logging
//! - loads the dataset store
//! - runs the overview pipeline
//! - prints reports and writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DatasetArgs, OverviewArgs, ProductsArgs, SearchArgs};
use crate::domain::{DEFAULT_DATE_COLUMN, OverviewConfig};
use crate::error::AppError;
use crate::store::{CsvSource, DatasetStore, LoadReport};

pub mod pipeline;

/// Environment variable naming the dataset CSV.
pub const ENV_DATASET: &str = "SALES_DATASET";

/// Environment variable naming the date column.
pub const ENV_DATE_COLUMN: &str = "SALES_DATE_COLUMN";

/// Dataset used when neither a flag nor the environment names one.
pub const DEFAULT_DATASET: &str = "dataset.csv";

/// Entry point for the `sov` binary.
pub fn run() -> Result<(), AppError> {
    // `sov` and `sov -p N02BE` should behave like `sov overview ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // `.env` provides defaults for SALES_* variables; a missing file is fine.
    dotenvy::dotenv().ok();
    init_tracing(&cli.command.dataset().log_level);

    match cli.command {
        Command::Overview(args) => handle_overview(args),
        Command::Products(args) => handle_products(args),
        Command::Search(args) => handle_search(args),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so `--json` output on stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_overview(args: OverviewArgs) -> Result<(), AppError> {
    let config = overview_config_from_args(&args);
    let (store, load) = open_store(&config.dataset_path, &config.date_column);

    let snapshot = store.get_all();
    let run = pipeline::run_overview(&snapshot, config.product.as_deref(), config.top_n);
    let response = run.overview.to_response();

    if config.json {
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| AppError::output(format!("Failed to serialize overview: {e}")))?;
        println!("{json}");
    } else {
        println!(
            "{}",
            crate::report::format_overview(&run.overview, config.product.as_deref(), &load)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_overview {
        crate::io::export::write_overview_json(path, &response)?;
        tracing::info!(path = %path.display(), "overview exported");
    }
    if let Some(path) = &config.export_totals {
        crate::io::export::write_totals_csv(path, &run.totals)?;
        tracing::info!(path = %path.display(), "totals exported");
    }

    Ok(())
}

fn handle_products(args: ProductsArgs) -> Result<(), AppError> {
    let (path, date_column) = resolve_dataset(&args.dataset);
    let (store, _) = open_store(&path, &date_column);
    let products = store.products();

    if args.json {
        let json = serde_json::to_string_pretty(&products)
            .map_err(|e| AppError::output(format!("Failed to serialize products: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_products(&products));
    }
    Ok(())
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let (path, date_column) = resolve_dataset(&args.dataset);
    let (store, _) = open_store(&path, &date_column);
    let hits = store.search(&args.query);
    tracing::debug!(query = %args.query, hits = hits.len(), "search");

    if args.json {
        let shown: Vec<_> = hits.iter().take(args.limit).collect();
        let json = serde_json::to_string_pretty(&shown)
            .map_err(|e| AppError::output(format!("Failed to serialize search results: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_search_results(&hits, args.limit));
    }
    Ok(())
}

fn open_store(path: &std::path::Path, date_column: &str) -> (DatasetStore, LoadReport) {
    DatasetStore::open(CsvSource::new(path).with_date_column(date_column))
}

pub fn overview_config_from_args(args: &OverviewArgs) -> OverviewConfig {
    let (dataset_path, date_column) = resolve_dataset(&args.dataset);
    OverviewConfig {
        dataset_path,
        date_column,
        product: args.product.clone(),
        top_n: args.top,
        json: args.json,
        export_overview: args.export.clone(),
        export_totals: args.export_totals.clone(),
    }
}

/// Resolve dataset path and date column: flag, then environment, then default.
pub fn resolve_dataset(args: &DatasetArgs) -> (PathBuf, String) {
    resolve_dataset_with(args, |key| std::env::var(key).ok())
}

fn resolve_dataset_with(args: &DatasetArgs, env: impl Fn(&str) -> Option<String>) -> (PathBuf, String) {
    let path = args
        .data
        .clone()
        .or_else(|| non_empty(env(ENV_DATASET)).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));

    let date_column = args
        .date_column
        .clone()
        .or_else(|| non_empty(env(ENV_DATE_COLUMN)))
        .unwrap_or_else(|| DEFAULT_DATE_COLUMN.to_string());

    (path, date_column)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Rewrite argv so `sov` defaults to `sov overview`.
///
/// Rules:
/// - `sov`                      -> `sov overview`
/// - `sov -p N02BE ...`         -> `sov overview -p N02BE ...`
/// - `sov --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("overview".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "overview" | "products" | "search");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "overview flags".
    if arg1.starts_with('-') {
        argv.insert(1, "overview".to_string());
        return argv;
    }

    argv
}
