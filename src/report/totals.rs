//! Per-product totals and the ranked leaderboard.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::domain::{Observation, ProductTotal};

/// Sum sales per product and rank products by total, highest first.
///
/// Products with equal totals keep the order in which they were first seen
/// in `observations` (grouping is insertion-ordered and the sort is stable).
pub fn aggregate(observations: &[Observation]) -> Vec<ProductTotal> {
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for o in observations {
        *totals.entry(o.product.as_str()).or_insert(0.0) += o.sales_or_zero();
    }

    let mut ranked: Vec<ProductTotal> = totals
        .into_iter()
        .map(|(name, total)| ProductTotal {
            name: name.to_string(),
            total: saturate(total),
        })
        .collect();
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    ranked
}

/// Sum of all sales (non-finite values count as `0`).
///
/// A sum that overflows is pinned to the largest finite `f64` of its sign.
pub fn total_sales(observations: &[Observation]) -> f64 {
    saturate(observations.iter().map(Observation::sales_or_zero).sum())
}

/// Clamp an overflowed sum back into the finite range; `NaN` becomes `0`.
fn saturate(sum: f64) -> f64 {
    if sum.is_nan() { 0.0 } else { sum.clamp(f64::MIN, f64::MAX) }
}

/// Keep the first `n` entries of a ranked leaderboard.
pub fn top_n(ranked: &[ProductTotal], n: usize) -> Vec<ProductTotal> {
    ranked.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(product: &str, sales: f64) -> Observation {
        Observation::new(product, sales, "2020-01-01")
    }

    fn names(totals: &[ProductTotal]) -> Vec<&str> {
        totals.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn sums_per_product_and_ranks_descending() {
        let data = vec![obs("A", 1.0), obs("B", 5.0), obs("A", 2.0), obs("C", 4.0)];
        let ranked = aggregate(&data);

        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        assert_eq!(ranked[0].total, 5.0);
        assert_eq!(ranked[2].total, 3.0);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let data = vec![
            obs("zeta", 2.0),
            obs("alpha", 1.0),
            obs("mid", 3.0),
            obs("alpha", 1.0),
            obs("omega", 2.0),
        ];
        let ranked = aggregate(&data);
        assert_eq!(names(&ranked), vec!["mid", "zeta", "alpha", "omega"]);
    }

    #[test]
    fn numeric_looking_product_names_do_not_reorder() {
        let data = vec![obs("b", 1.0), obs("10", 1.0), obs("2", 1.0)];
        assert_eq!(names(&aggregate(&data)), vec!["b", "10", "2"]);
    }

    #[test]
    fn totals_sum_to_dataset_total() {
        let data = vec![
            obs("A", 1.25),
            obs("B", f64::NAN),
            obs("C", -2.0),
            obs("A", 3.5),
            obs("B", 10.0),
        ];
        let ranked = aggregate(&data);
        let ranked_sum: f64 = ranked.iter().map(|t| t.total).sum();

        assert!((ranked_sum - total_sales(&data)).abs() < 1e-12);
        assert!((total_sales(&data) - 12.75).abs() < 1e-12);
        for pair in ranked.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn overflowing_sums_stay_finite() {
        let data = vec![
            obs("A", 1e308),
            obs("B", 1e308),
            obs("A", 1e308),
            obs("B", 1e308),
            obs("C", -1e308),
            obs("C", -1e308),
        ];
        let ranked = aggregate(&data);

        assert_eq!(names(&ranked), vec!["A", "B", "C"]);
        assert_eq!(ranked[0].total, f64::MAX);
        assert_eq!(ranked[2].total, f64::MIN);
        assert!(ranked.iter().all(|t| t.total.is_finite()));
        assert_eq!(total_sales(&data[..4]), f64::MAX);
    }

    #[test]
    fn empty_input_yields_empty_leaderboard() {
        assert!(aggregate(&[]).is_empty());
        assert_eq!(total_sales(&[]), 0.0);
    }

    #[test]
    fn top_n_truncates() {
        let data: Vec<Observation> = (0..8).map(|i| obs(&format!("P{i}"), i as f64)).collect();
        let ranked = aggregate(&data);
        let top = top_n(&ranked, 5);
        assert_eq!(names(&top), vec!["P7", "P6", "P5", "P4", "P3"]);
        assert_eq!(top_n(&ranked[..2], 5).len(), 2);
    }
}
