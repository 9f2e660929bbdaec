//! Command-line parsing for the sales overview tool.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! dispatch (`app`) and from the analytics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_TOP_N;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sov", version, about = "Sales overview: product totals, monthly peaks, and a trend forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the overview (totals, growth, forecast, top products).
    Overview(OverviewArgs),
    /// List distinct product names in first-seen order.
    Products(ProductsArgs),
    /// Find observations whose product, date, or sales contain a text.
    Search(SearchArgs),
}

impl Command {
    pub fn dataset(&self) -> &DatasetArgs {
        match self {
            Command::Overview(args) => &args.dataset,
            Command::Products(args) => &args.dataset,
            Command::Search(args) => &args.dataset,
        }
    }
}

/// Where the dataset lives and how to log while reading it.
#[derive(Debug, Args, Clone)]
pub struct DatasetArgs {
    /// Wide sales CSV (one date column, one column per product).
    ///
    /// Falls back to `SALES_DATASET` (also read from `.env`), then `dataset.csv`.
    #[arg(short = 'f', long = "data", value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Name of the date column.
    ///
    /// Falls back to `SALES_DATE_COLUMN`, then `datum`.
    #[arg(long)]
    pub date_column: Option<String>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Options for the overview.
#[derive(Debug, Args, Clone)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Restrict the overview to one product (exact name).
    #[arg(short = 'p', long)]
    pub product: Option<String>,

    /// Leaderboard size.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Print the response body as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Export the overview response to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Export the full product leaderboard to CSV.
    #[arg(long = "export-totals", value_name = "CSV")]
    pub export_totals: Option<PathBuf>,
}

/// Options for listing products.
#[derive(Debug, Args, Clone)]
pub struct ProductsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Print a JSON array instead of one name per line.
    #[arg(long)]
    pub json: bool,
}

/// Options for searching observations.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Text to look for (case-insensitive).
    pub query: String,

    /// Maximum rows to print.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Print matches as JSON.
    #[arg(long)]
    pub json: bool,
}
