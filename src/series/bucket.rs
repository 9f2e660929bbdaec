//! Month bucketing.
//!
//! Each calendar month is represented by its single highest-sales
//! observation (not a sum or mean). Buckets are then ordered by the actual
//! timestamp of that observation rather than by the `YYYY-MM` key, so the
//! series stays chronological whatever order the source rows arrive in.

use chrono::{Datelike, NaiveDateTime};
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::domain::{MonthlyPoint, Observation, Series, parse_observation_date};

/// Candidate for a month's representative point.
struct Retained<'a> {
    at: NaiveDateTime,
    value: f64,
    label: &'a str,
}

/// `YYYY-MM` key for a timestamp (month is 1-based, zero-padded).
pub fn month_key(at: &NaiveDateTime) -> String {
    format!("{:04}-{:02}", at.year(), at.month())
}

/// Reduce observations to one max-sales point per month, chronologically.
///
/// Observations whose date label does not parse are skipped. On equal sales
/// within a month the first observation seen wins. Buckets whose retained
/// observations share the same timestamp keep first-seen month order.
pub fn bucket(observations: &[Observation]) -> Series {
    let mut months: IndexMap<String, Retained<'_>> = IndexMap::new();

    for o in observations {
        let Some(at) = parse_observation_date(&o.date) else {
            continue;
        };
        let candidate = Retained {
            at,
            value: o.sales_or_zero(),
            label: o.date.as_str(),
        };

        match months.entry(month_key(&at)) {
            Entry::Occupied(mut slot) => {
                if candidate.value > slot.get().value {
                    slot.insert(candidate);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
        }
    }

    let mut retained: Vec<(String, Retained<'_>)> = months.into_iter().collect();
    retained.sort_by_key(|(_, r)| r.at);

    let points = retained
        .into_iter()
        .map(|(month_key, r)| MonthlyPoint {
            month_key,
            value: r.value,
            label: r.label.to_string(),
        })
        .collect();

    Series { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn obs(sales: f64, date: &str) -> Observation {
        Observation::new("A", sales, date)
    }

    #[test]
    fn keeps_monthly_maximum_and_its_label() {
        let data = vec![
            obs(3.0, "2014-01-02"),
            obs(9.0, "2014-01-15"),
            obs(4.0, "2014-01-31"),
            obs(2.0, "2014-02-01"),
        ];
        let series = bucket(&data);

        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].month_key, "2014-01");
        assert_eq!(series.points[0].value, 9.0);
        assert_eq!(series.points[0].label, "2014-01-15");
        assert_eq!(series.points[1].month_key, "2014-02");
        assert_eq!(series.points[1].label, "2014-02-01");
    }

    #[test]
    fn ties_keep_first_observation() {
        let data = vec![obs(5.0, "1/3/2014"), obs(5.0, "1/20/2014")];
        let series = bucket(&data);
        assert_eq!(series.points[0].label, "1/3/2014");
    }

    #[test]
    fn skips_unparseable_dates() {
        let data = vec![obs(100.0, "garbage"), obs(1.0, "2020-05-05"), obs(50.0, "")];
        let series = bucket(&data);
        assert_eq!(series.values(), vec![1.0]);
    }

    #[test]
    fn orders_by_retained_date_not_arrival() {
        let data = vec![
            obs(1.0, "2021-01-10"),
            obs(2.0, "2020-12-10"),
            obs(3.0, "2020-02-01"),
            obs(4.0, "2020-11-30"),
        ];
        let series = bucket(&data);
        let keys: Vec<&str> = series.points.iter().map(|p| p.month_key.as_str()).collect();
        assert_eq!(keys, vec!["2020-02", "2020-11", "2020-12", "2021-01"]);
    }

    #[test]
    fn mixed_label_formats_sort_chronologically() {
        let data = vec![obs(1.0, "12/1/2019"), obs(2.0, "2019-03-04"), obs(3.0, "2019/07/01")];
        let series = bucket(&data);
        assert_eq!(series.labels(), vec!["2019-03-04", "2019/07/01", "12/1/2019"]);
    }

    #[test]
    fn never_more_points_than_months_and_values_are_maxima() {
        let data = vec![
            obs(1.0, "2020-01-01"),
            obs(7.0, "2020-01-20"),
            obs(-2.0, "2020-03-03"),
            obs(-1.0, "2020-03-04"),
            obs(0.0, "bad"),
            obs(6.0, "2020-01-21"),
        ];
        let series = bucket(&data);

        let months: HashSet<String> = data
            .iter()
            .filter_map(|o| parse_observation_date(&o.date))
            .map(|at| month_key(&at))
            .collect();
        assert!(series.len() <= months.len());
        assert_eq!(series.values(), vec![7.0, -1.0]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let data = vec![obs(1.0, "2020-01-01"), obs(1.0, "2020-02-01T00:00:00")];
        assert_eq!(bucket(&data), bucket(&data));
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(bucket(&[]).is_empty());
    }
}
