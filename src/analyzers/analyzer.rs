use chrono::Utc;
use tracing::{debug, info};

use crate::analyzers::aggregate::{
    Aggregation, Domain, GroupKey, Reducer, aggregate, aggregate_pair,
};
use crate::analyzers::pivot::Pivot;
use crate::analyzers::report::{Direction, SortBy, SortField, emit};
use crate::analyzers::types::{LoanReport, Section, SectionRow};
use crate::record::{Dataset, LoanRow};
use crate::tiers::{BalanceTier, Category, CreditTier, DtiTier, IncomeTier, Purpose};

const DEFAULT_RATE: &str = "Default Rate %";
const APPLICANTS: &str = "Applicants";
const DELINQUENCIES: &str = "Delinquent (Last 24 months)";
const PUBLIC_RECORDS: &str = "Public Records (Bankruptcy, tax liens or judgements)";

/// Static description of a section.
struct Meta {
    id: &'static str,
    title: &'static str,
    key_labels: Vec<&'static str>,
    value_label: &'static str,
}

/// Runs every analysis over `dataset`.
///
/// Section order follows the questions the report answers: credit score,
/// income, revolving balance, debt-to-income, delinquencies, delinquencies
/// with public records, then loan purpose.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub fn build_report(dataset: &Dataset, source: &str) -> LoanReport {
    let rows = dataset.rows();

    let sections = vec![
        tier_section(
            Meta {
                id: "default_rate_by_credit_tier",
                title: "Default rate by FICO tier",
                key_labels: vec![CreditTier::TITLE],
                value_label: DEFAULT_RATE,
            },
            &aggregate(&rows, credit_tier, &Domain::declared(), outcome, Reducer::Rate),
            None,
        ),
        tier_section(
            Meta {
                id: "default_rate_by_income_tier",
                title: "Default rate by income tier",
                key_labels: vec![IncomeTier::TITLE],
                value_label: DEFAULT_RATE,
            },
            &aggregate(&rows, income_tier, &Domain::declared(), outcome, Reducer::Rate),
            None,
        ),
        tier_section(
            Meta {
                id: "applicants_by_income_tier",
                title: "Applicants in each income tier",
                key_labels: vec![IncomeTier::TITLE],
                value_label: APPLICANTS,
            },
            &aggregate(&rows, income_tier, &Domain::declared(), outcome, Reducer::Count),
            Some(SortBy::value_descending()),
        ),
        tier_section(
            Meta {
                id: "avg_revolving_balance_by_income_tier",
                title: "Average credit card balance by income tier",
                key_labels: vec![IncomeTier::TITLE],
                value_label: "Average Revolving Balances",
            },
            &aggregate(&rows, income_tier, &Domain::declared(), revolving_balance, Reducer::Mean),
            None,
        ),
        tier_section(
            Meta {
                id: "default_rate_by_balance_tier",
                title: "Default rate by outstanding credit balance",
                key_labels: vec![BalanceTier::TITLE],
                value_label: DEFAULT_RATE,
            },
            &aggregate(&rows, balance_tier, &Domain::declared(), outcome, Reducer::Rate),
            None,
        ),
        tier_section(
            Meta {
                id: "default_rate_by_dti_tier",
                title: "Default rate by debt-to-income tier",
                key_labels: vec![DtiTier::TITLE],
                value_label: DEFAULT_RATE,
            },
            &aggregate(&rows, dti_tier, &Domain::declared(), outcome, Reducer::Rate),
            None,
        ),
        count_section(
            Meta {
                id: "default_rate_by_delinquencies",
                title: "Default rate by delinquencies in the last 24 months",
                key_labels: vec![DELINQUENCIES],
                value_label: DEFAULT_RATE,
            },
            &aggregate(&rows, delinquencies, &Domain::Observed, outcome, Reducer::Rate),
        ),
        count_section(
            Meta {
                id: "applicants_by_delinquencies",
                title: "Applicants by delinquency count",
                key_labels: vec![DELINQUENCIES],
                value_label: APPLICANTS,
            },
            &aggregate(&rows, delinquencies, &Domain::Observed, outcome, Reducer::Count),
        ),
        pair_section(
            Meta {
                id: "default_rate_by_delinquency_and_public_records",
                title: "Default rate by delinquencies and public records",
                key_labels: vec![DELINQUENCIES, PUBLIC_RECORDS],
                value_label: DEFAULT_RATE,
            },
            &aggregate_pair(
                &rows,
                delinquencies,
                &Domain::Observed,
                public_records,
                &Domain::Observed,
                outcome,
                Reducer::Rate,
            ),
        ),
        tier_section(
            Meta {
                id: "default_rate_by_purpose",
                title: "Default rate by loan purpose",
                key_labels: vec![Purpose::TITLE],
                value_label: DEFAULT_RATE,
            },
            &aggregate(&rows, purpose, &Domain::declared(), outcome, Reducer::Rate),
            Some(SortBy::value_descending()),
        ),
    ];

    info!(sections = sections.len(), "Loan report built");

    LoanReport {
        generated_at: Utc::now(),
        source: source.to_string(),
        records: dataset.len(),
        sections,
    }
}

/// The first `n` records with their derived fields.
pub fn preview(dataset: &Dataset, n: usize) -> Vec<LoanRow<'_>> {
    dataset.rows().into_iter().take(n).collect()
}

fn outcome(row: &LoanRow<'_>) -> Option<f64> {
    row.record.outcome()
}

fn revolving_balance(row: &LoanRow<'_>) -> Option<f64> {
    row.record.revolving_balance
}

fn credit_tier(row: &LoanRow<'_>) -> GroupKey<CreditTier> {
    row.derived.credit_tier.into()
}

fn income_tier(row: &LoanRow<'_>) -> GroupKey<IncomeTier> {
    row.derived.income_tier.into()
}

fn dti_tier(row: &LoanRow<'_>) -> GroupKey<DtiTier> {
    row.derived.dti_tier.into()
}

fn balance_tier(row: &LoanRow<'_>) -> GroupKey<BalanceTier> {
    row.derived.balance_tier.into()
}

/// A missing purpose drops the record; an unknown one is unclassified.
fn purpose(row: &LoanRow<'_>) -> GroupKey<Purpose> {
    match row.record.purpose {
        None => GroupKey::Missing,
        Some(_) => row.derived.purpose.into(),
    }
}

fn delinquencies(row: &LoanRow<'_>) -> GroupKey<u32> {
    GroupKey::from_field(row.record.delinquencies_2y)
}

fn public_records(row: &LoanRow<'_>) -> GroupKey<u32> {
    GroupKey::from_field(row.record.public_records)
}

fn tier_section<K: Category>(meta: Meta, agg: &Aggregation<K>, sort_by: Option<SortBy>) -> Section {
    let rows = emit(agg, sort_by)
        .into_iter()
        .map(|r| SectionRow {
            key: vec![r.key.label().to_string()],
            value: r.value,
            count: r.count,
        })
        .collect();

    finish(meta, agg, rows, None)
}

fn count_section(meta: Meta, agg: &Aggregation<u32>) -> Section {
    let sort_by = SortBy {
        field: SortField::Key,
        direction: Direction::Ascending,
    };
    let rows = emit(agg, Some(sort_by))
        .into_iter()
        .map(|r| SectionRow {
            key: vec![r.key.to_string()],
            value: r.value,
            count: r.count,
        })
        .collect();

    finish(meta, agg, rows, None)
}

fn pair_section(meta: Meta, agg: &Aggregation<(u32, u32)>) -> Section {
    let rows = emit(agg, None)
        .into_iter()
        .map(|r| SectionRow {
            key: vec![r.key.0.to_string(), r.key.1.to_string()],
            value: r.value,
            count: r.count,
        })
        .collect();

    let pivot = Pivot::from_aggregation(agg).map_axes(u32::to_string, u32::to_string);

    finish(meta, agg, rows, Some(pivot))
}

fn finish<K: PartialEq>(
    meta: Meta,
    agg: &Aggregation<K>,
    rows: Vec<SectionRow>,
    pivot: Option<Pivot<String, String>>,
) -> Section {
    debug!(
        section = meta.id,
        rows = rows.len(),
        classified = agg.classified_count(),
        unclassified = agg.unclassified.count,
        dropped = agg.dropped,
        "Section built"
    );

    Section {
        id: meta.id,
        title: meta.title,
        key_labels: meta.key_labels,
        value_label: meta.value_label,
        reducer: agg.reducer,
        rows,
        unclassified: agg.unclassified,
        dropped: agg.dropped,
        pivot,
    }
}
