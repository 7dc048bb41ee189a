//! Turns aggregations into ordered report rows.

use std::cmp::Ordering;

use serde::Serialize;

use crate::analyzers::aggregate::Aggregation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// The aggregation's own group order.
    Key,
    /// The reduced statistic.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub field: SortField,
    pub direction: Direction,
}

impl SortBy {
    pub fn value_descending() -> Self {
        SortBy {
            field: SortField::Value,
            direction: Direction::Descending,
        }
    }
}

/// One emitted row: `(key, statistic)` plus the partition size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<K> {
    pub key: K,
    pub value: Option<f64>,
    pub count: usize,
}

/// Emits the groups of `agg` as rows.
///
/// Without `sort_by` the aggregation's group order is kept. Sorting by value
/// is stable, so ties stay in group order, and undefined values always go
/// last.
pub fn emit<K: Clone>(agg: &Aggregation<K>, sort_by: Option<SortBy>) -> Vec<ReportRow<K>> {
    let mut rows: Vec<ReportRow<K>> = agg
        .groups
        .iter()
        .map(|(key, stat)| ReportRow {
            key: key.clone(),
            value: stat.value,
            count: stat.count,
        })
        .collect();

    match sort_by {
        None
        | Some(SortBy {
            field: SortField::Key,
            direction: Direction::Ascending,
        }) => {}
        Some(SortBy {
            field: SortField::Key,
            direction: Direction::Descending,
        }) => rows.reverse(),
        Some(SortBy {
            field: SortField::Value,
            direction,
        }) => rows.sort_by(|a, b| compare_values(a.value, b.value, direction)),
    }

    rows
}

fn compare_values(a: Option<f64>, b: Option<f64>, direction: Direction) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            Direction::Ascending => a.total_cmp(&b),
            Direction::Descending => b.total_cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::{Domain, GroupKey, GroupStat, Reducer, aggregate};
    use crate::tiers::Purpose;

    fn stat(value: Option<f64>) -> GroupStat {
        GroupStat {
            count: if value.is_some() { 10 } else { 0 },
            value,
        }
    }

    fn purpose_rates() -> Aggregation<Purpose> {
        Aggregation {
            reducer: Reducer::Rate,
            groups: vec![
                (Purpose::AllOther, stat(Some(16.6))),
                (Purpose::CreditCard, stat(Some(30.0))),
                (Purpose::DebtConsolidation, stat(None)),
                (Purpose::Educational, stat(Some(30.0))),
                (Purpose::SmallBusiness, stat(Some(27.8))),
            ],
            unclassified: stat(None),
            dropped: 0,
        }
    }

    fn keys(rows: &[ReportRow<Purpose>]) -> Vec<Purpose> {
        rows.iter().map(|r| r.key).collect()
    }

    #[test]
    fn test_emit_keeps_group_order() {
        let rows = emit(&purpose_rates(), None);
        assert_eq!(keys(&rows), purpose_rates().keys().copied().collect::<Vec<_>>());
        assert_eq!(rows[1].value, Some(30.0));
        assert_eq!(rows[1].count, 10);
    }

    #[test]
    fn test_emit_descending_keeps_ties_in_order() {
        let rows = emit(&purpose_rates(), Some(SortBy::value_descending()));
        assert_eq!(
            keys(&rows),
            vec![
                Purpose::CreditCard,
                Purpose::Educational,
                Purpose::SmallBusiness,
                Purpose::AllOther,
                Purpose::DebtConsolidation,
            ]
        );
    }

    #[test]
    fn test_emit_ascending_puts_undefined_last() {
        let rows = emit(
            &purpose_rates(),
            Some(SortBy {
                field: SortField::Value,
                direction: Direction::Ascending,
            }),
        );
        assert_eq!(
            keys(&rows),
            vec![
                Purpose::AllOther,
                Purpose::SmallBusiness,
                Purpose::CreditCard,
                Purpose::Educational,
                Purpose::DebtConsolidation,
            ]
        );
    }

    #[test]
    fn test_emit_mean_rounded_to_zero_ties_with_zero() {
        let balances = vec![("a", 0.0), ("b", -0.4)];
        let agg = aggregate(
            &balances,
            |v| GroupKey::Known(v.0),
            &Domain::Fixed(vec!["a", "b"]),
            |v| Some(v.1),
            Reducer::Mean,
        );
        let rows = emit(
            &agg,
            Some(SortBy {
                field: SortField::Value,
                direction: Direction::Ascending,
            }),
        );

        let sorted: Vec<_> = rows.iter().map(|r| (r.key, r.value)).collect();
        assert_eq!(sorted, vec![("a", Some(0.0)), ("b", Some(0.0))]);
        assert!(rows.iter().all(|r| r.value.is_some_and(f64::is_sign_positive)));
    }

    #[test]
    fn test_emit_key_descending_reverses() {
        let rows = emit(
            &purpose_rates(),
            Some(SortBy {
                field: SortField::Key,
                direction: Direction::Descending,
            }),
        );
        assert_eq!(rows.first().map(|r| r.key), Some(Purpose::SmallBusiness));
        assert_eq!(rows.last().map(|r| r.key), Some(Purpose::AllOther));
    }
}
