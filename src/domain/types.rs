//! Shared domain types.
//!
//! Observations are loaded once and shared read-only; everything else here is
//! derived per request and dropped when the response has been produced.

use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::domain::coerce::format_fixed2;

/// Sentinel shown whenever a figure cannot be computed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Default size of the product leaderboard.
pub const DEFAULT_TOP_N: usize = 5;

/// Default name of the date column in the wide sales table.
pub const DEFAULT_DATE_COLUMN: &str = "datum";

/// One `(product, date, sales)` record.
///
/// `date` keeps the original label from the source table; it is only parsed
/// when the bucketer needs a calendar month. `cell` is the sales cell as
/// written in the source (`"3.50"`, `""`, `"n/a"`), used for text search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub product: String,
    pub sales: f64,
    pub date: String,
    #[serde(skip)]
    pub cell: String,
}

impl Observation {
    /// Build an observation whose source cell is the rendered `sales` value.
    pub fn new(product: impl Into<String>, sales: f64, date: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            sales,
            date: date.into(),
            cell: sales.to_string(),
        }
    }

    /// Replace the source cell text.
    pub fn with_cell(mut self, cell: impl Into<String>) -> Self {
        self.cell = cell.into();
        self
    }

    /// Sales value with non-finite numbers treated as `0`.
    pub fn sales_or_zero(&self) -> f64 {
        if self.sales.is_finite() { self.sales } else { 0.0 }
    }
}

/// Summed sales for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub name: String,
    pub total: f64,
}

/// The representative (maximum) observation of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPoint {
    /// `YYYY-MM`.
    pub month_key: String,
    pub value: f64,
    /// Date label of the observation that produced `value`.
    pub label: String,
}

/// Chronologically ordered monthly points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<MonthlyPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.label.clone()).collect()
    }

    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.value)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

/// A finite percentage, rendered with two decimals (`"12.34"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(f64);

impl Percent {
    /// Wrap a value; non-finite input collapses to `0`.
    pub fn new(value: f64) -> Self {
        if value.is_finite() { Self(value) } else { Self(0.0) }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_fixed2(self.0))
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Projected next-period change, or `N/A` when the series cannot support one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Forecast {
    Percent(Percent),
    NotAvailable,
}

impl Forecast {
    pub fn is_available(self) -> bool {
        matches!(self, Forecast::Percent(_))
    }
}

impl std::fmt::Display for Forecast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Forecast::Percent(p) => write!(f, "{p}"),
            Forecast::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Forecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The computed overview for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewResult {
    pub total_sales: f64,
    pub growth_percent: Percent,
    pub forecast_percent: Forecast,
    pub top_product_name: String,
    pub series: Series,
    /// Leaderboard (top-N when unscoped, one synthetic entry when scoped).
    pub top: Vec<ProductTotal>,
}

impl OverviewResult {
    /// Convert to the response body served to callers.
    pub fn to_response(&self) -> OverviewResponse {
        OverviewResponse {
            total_sales: self.total_sales,
            growth: self.growth_percent,
            forecast: self.forecast_percent,
            top_product: self.top_product_name.clone(),
            chart: Chart {
                points: self.series.values(),
                xlabels: self.series.labels(),
            },
            top5: self.top.clone(),
        }
    }
}

/// Chart payload: parallel arrays of values and date labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub points: Vec<f64>,
    pub xlabels: Vec<String>,
}

/// Wire form of `OverviewResult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub total_sales: f64,
    pub growth: Percent,
    pub forecast: Forecast,
    pub top_product: String,
    pub chart: Chart,
    pub top5: Vec<ProductTotal>,
}

/// A run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, the environment, and defaults.
#[derive(Debug, Clone)]
pub struct OverviewConfig {
    pub dataset_path: PathBuf,
    pub date_column: String,
    /// Restrict the overview to one product (exact name match).
    pub product: Option<String>,
    pub top_n: usize,
    pub json: bool,
    pub export_overview: Option<PathBuf>,
    pub export_totals: Option<PathBuf>,
}
