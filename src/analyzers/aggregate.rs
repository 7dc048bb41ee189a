use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;
use tracing::debug;

use crate::analyzers::utility::{as_rate, mean, round_to};
use crate::tiers::Category;

/// What a key selector resolved to for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey<K> {
    /// The record belongs to the group `K`.
    Known(K),
    /// The source field is present but has no label (out of domain).
    Unclassified,
    /// The source field is absent; the record is skipped for this pass.
    Missing,
}

impl<K> From<Option<K>> for GroupKey<K> {
    /// Derived tiers: `None` means the value could not be classified.
    fn from(value: Option<K>) -> Self {
        match value {
            Some(k) => GroupKey::Known(k),
            None => GroupKey::Unclassified,
        }
    }
}

impl<K> GroupKey<K> {
    /// Raw fields: `None` means the field itself is missing.
    pub fn from_field(value: Option<K>) -> Self {
        match value {
            Some(k) => GroupKey::Known(k),
            None => GroupKey::Missing,
        }
    }
}

/// The set of groups an aggregation reports, and their order.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain<K> {
    /// Every listed key is reported in this order, even when empty.
    Fixed(Vec<K>),
    /// Only keys seen in the input, ascending.
    Observed,
}

impl<K: Category> Domain<K> {
    /// The full label set of a category, in its declared order.
    pub fn declared() -> Self {
        Domain::Fixed(K::ORDER.to_vec())
    }
}

/// Reduction applied to each partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    /// Mean of a 0/1 field as a percentage, one decimal.
    Rate,
    /// Mean rounded to whole units.
    Mean,
    /// Partition size.
    Count,
}

impl Reducer {
    fn needs_target(self) -> bool {
        !matches!(self, Reducer::Count)
    }

    fn reduce(self, values: &[f64]) -> GroupStat {
        let count = values.len();
        let value = match self {
            Reducer::Rate => mean(values).map(as_rate),
            Reducer::Mean => mean(values).map(|m| round_to(m, 0)),
            Reducer::Count => Some(count as f64),
        };
        GroupStat { count, value }
    }
}

/// Size of a partition and its reduced statistic.
///
/// `value` is `None` for an empty partition under `Rate` or `Mean`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupStat {
    pub count: usize,
    pub value: Option<f64>,
}

/// Ordered result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation<K> {
    pub reducer: Reducer,
    pub groups: Vec<(K, GroupStat)>,
    /// Records whose key had no label in the domain.
    pub unclassified: GroupStat,
    /// Records skipped because the key or target field was missing.
    pub dropped: usize,
}

impl<K: PartialEq> Aggregation<K> {
    pub fn get(&self, key: &K) -> Option<&GroupStat> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn value(&self, key: &K) -> Option<f64> {
        self.get(key).and_then(|s| s.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(k, _)| k)
    }

    /// Records that landed in a reported group.
    pub fn classified_count(&self) -> usize {
        self.groups.iter().map(|(_, s)| s.count).sum()
    }
}

/// Partitions `records` by `key` and reduces `target` within each partition.
///
/// Records with a missing key, or a missing/NaN target when the reducer reads
/// it, are counted in `dropped`. Unclassified keys, and known keys outside a
/// fixed domain, go to the `unclassified` bucket.
pub fn aggregate<R, K, KF, TF>(
    records: &[R],
    key: KF,
    domain: &Domain<K>,
    target: TF,
    reducer: Reducer,
) -> Aggregation<K>
where
    K: Clone + Eq + Hash + Ord,
    KF: Fn(&R) -> GroupKey<K>,
    TF: Fn(&R) -> Option<f64>,
{
    // Observed keys are resolved before targets are filtered, so a key seen
    // only on records with a missing target still reports an empty group.
    let keys = resolve_domain(records, &key, domain);
    let declared: Option<HashSet<&K>> = match domain {
        Domain::Fixed(keys) => Some(keys.iter().collect()),
        Domain::Observed => None,
    };

    let mut partitions: HashMap<K, Vec<f64>> = HashMap::new();
    let mut unclassified = Vec::new();
    let mut dropped = 0usize;

    for record in records {
        let group = key(record);
        if group == GroupKey::Missing {
            dropped += 1;
            continue;
        }

        let value = if reducer.needs_target() {
            match target(record).filter(|v| !v.is_nan()) {
                Some(v) => v,
                None => {
                    dropped += 1;
                    continue;
                }
            }
        } else {
            1.0
        };

        match group {
            GroupKey::Known(k) if declared.as_ref().is_none_or(|d| d.contains(&k)) => {
                partitions.entry(k).or_default().push(value);
            }
            _ => unclassified.push(value),
        }
    }

    let groups = keys
        .into_iter()
        .map(|k| {
            let stat = reducer.reduce(partitions.get(&k).map(Vec::as_slice).unwrap_or(&[]));
            (k, stat)
        })
        .collect::<Vec<_>>();

    let unclassified = reducer.reduce(&unclassified);

    debug!(
        groups = groups.len(),
        unclassified = unclassified.count,
        dropped,
        "Aggregation complete"
    );

    Aggregation {
        reducer,
        groups,
        unclassified,
        dropped,
    }
}

/// Two-factor variant of [`aggregate`], grouping by `(A, B)`.
///
/// Groups cover the full product of both domains in row-major order, so the
/// result pivots into a complete matrix. A record with either key
/// unclassified is unclassified; either key missing drops it.
pub fn aggregate_pair<R, A, B, KA, KB, TF>(
    records: &[R],
    key_a: KA,
    domain_a: &Domain<A>,
    key_b: KB,
    domain_b: &Domain<B>,
    target: TF,
    reducer: Reducer,
) -> Aggregation<(A, B)>
where
    A: Clone + Eq + Hash + Ord,
    B: Clone + Eq + Hash + Ord,
    KA: Fn(&R) -> GroupKey<A>,
    KB: Fn(&R) -> GroupKey<B>,
    TF: Fn(&R) -> Option<f64>,
{
    let rows = resolve_domain(records, &key_a, domain_a);
    let columns = resolve_domain(records, &key_b, domain_b);

    let product = rows
        .iter()
        .flat_map(|a| columns.iter().map(move |b| (a.clone(), b.clone())))
        .collect();

    aggregate(
        records,
        |r| match (key_a(r), key_b(r)) {
            (GroupKey::Missing, _) | (_, GroupKey::Missing) => GroupKey::Missing,
            (GroupKey::Known(a), GroupKey::Known(b)) => GroupKey::Known((a, b)),
            _ => GroupKey::Unclassified,
        },
        &Domain::Fixed(product),
        target,
        reducer,
    )
}

/// Lists the keys a domain stands for over `records`.
fn resolve_domain<R, K, KF>(records: &[R], key: &KF, domain: &Domain<K>) -> Vec<K>
where
    K: Clone + Eq + Hash + Ord,
    KF: Fn(&R) -> GroupKey<K>,
{
    match domain {
        Domain::Fixed(keys) => keys.clone(),
        Domain::Observed => {
            let mut keys: Vec<K> = records
                .iter()
                .filter_map(|r| match key(r) {
                    GroupKey::Known(k) => Some(k),
                    _ => None,
                })
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            keys.sort();
            keys
        }
    }
}
