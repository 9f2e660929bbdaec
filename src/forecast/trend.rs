//! Next-period growth from a linear trend.

use crate::domain::{Forecast, Percent};
use crate::math::fit_index_trend;

/// Project the next period's percentage change from a series of values.
///
/// Fits an OLS line to `(index, value)`, predicts the value at
/// `index = len`, and compares it with the last observed value:
///
/// `((predicted - last) / last) * 100`
///
/// Returns `Forecast::NotAvailable` for fewer than two points, a last value
/// of zero, or any numeric failure. Never panics.
pub fn forecast(values: &[f64]) -> Forecast {
    if values.len() < 2 {
        return Forecast::NotAvailable;
    }

    let last = values[values.len() - 1];
    if last == 0.0 || !last.is_finite() {
        return Forecast::NotAvailable;
    }

    let Some(trend) = fit_index_trend(values) else {
        tracing::debug!(points = values.len(), "trend fit failed");
        return Forecast::NotAvailable;
    };

    let predicted = trend.predict(values.len() as f64);
    let change = (predicted - last) / last * 100.0;
    if !change.is_finite() {
        return Forecast::NotAvailable;
    }

    tracing::debug!(predicted, last, change, "forecast growth");
    Forecast::Percent(Percent::new(change))
}
