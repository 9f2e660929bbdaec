//! Shared "overview pipeline" logic used by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter by scope -> totals/leaderboard -> monthly series -> growth -> forecast
//!
//! Each call recomputes everything from the snapshot it is handed; nothing is
//! cached between requests.

use std::borrow::Cow;

use crate::domain::{NOT_AVAILABLE, Observation, OverviewResult, Percent, ProductTotal, Series};
use crate::forecast::forecast;
use crate::report::{aggregate, top_n, total_sales};
use crate::series::bucket;
use crate::store::Dataset;

/// All computed outputs of a single overview request.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub overview: OverviewResult,
    /// Full ranked leaderboard for the (possibly scoped) observation set.
    pub totals: Vec<ProductTotal>,
    /// Number of observations the overview was computed from.
    pub observations: usize,
}

/// Execute the overview pipeline against a dataset snapshot.
pub fn run_overview(dataset: &Dataset, scope: Option<&str>, top: usize) -> RunOutput {
    let filtered = scoped(&dataset.observations, scope);
    tracing::debug!(
        scope = scope.unwrap_or("*"),
        observations = filtered.len(),
        "building overview"
    );

    let totals = aggregate(&filtered);
    RunOutput {
        overview: assemble(&filtered, &totals, scope, top),
        totals,
        observations: filtered.len(),
    }
}

/// Compose totals, series, growth, and forecast into one overview.
///
/// With a `scope`, only observations of that exact product are used and the
/// leaderboard collapses to a single synthetic entry for it. An unknown scope
/// simply yields an empty overview.
pub fn build_overview(observations: &[Observation], scope: Option<&str>, top: usize) -> OverviewResult {
    let filtered = scoped(observations, scope);
    let ranked = aggregate(&filtered);
    assemble(&filtered, &ranked, scope, top)
}

/// Build the overview from observations that are already scoped and ranked.
fn assemble(
    filtered: &[Observation],
    ranked: &[ProductTotal],
    scope: Option<&str>,
    top: usize,
) -> OverviewResult {
    let total = total_sales(filtered);
    let series = bucket(filtered);
    let growth = growth_percent(&series);
    let forecast_percent = forecast(&series.values());

    let (top_product_name, leaderboard) = match scope {
        Some(product) => (
            product.to_string(),
            vec![ProductTotal {
                name: product.to_string(),
                total,
            }],
        ),
        None => {
            let name = ranked
                .first()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            (name, top_n(ranked, top))
        }
    };

    OverviewResult {
        total_sales: total,
        growth_percent: growth,
        forecast_percent,
        top_product_name,
        series,
        top: leaderboard,
    }
}

/// First-to-last change of the series, in percent.
///
/// A first point of `0` is replaced by a divisor of `1`, which inflates the
/// figure but keeps it finite. An empty series reports `0`.
pub fn growth_percent(series: &Series) -> Percent {
    let (Some(first), Some(last)) = (series.first_value(), series.last_value()) else {
        return Percent::new(0.0);
    };
    let divisor = if first == 0.0 { 1.0 } else { first };
    Percent::new((last - first) / divisor * 100.0)
}

fn scoped<'a>(observations: &'a [Observation], scope: Option<&str>) -> Cow<'a, [Observation]> {
    match scope {
        Some(product) => Cow::Owned(
            observations
                .iter()
                .filter(|o| o.product == product)
                .cloned()
                .collect(),
        ),
        None => Cow::Borrowed(observations),
    }
}
