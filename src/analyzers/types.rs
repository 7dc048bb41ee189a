//! Data types produced by the loan report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::aggregate::{GroupStat, Reducer};
use crate::analyzers::pivot::Pivot;

/// A report row with its key rendered as labels, one per grouping factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRow {
    pub key: Vec<String>,
    pub value: Option<f64>,
    pub count: usize,
}

/// One analysis: a grouping, a reducer and the resulting rows.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub(crate) id: &'static str,
    pub(crate) title: &'static str,
    /// Column headers for the key factors.
    pub(crate) key_labels: Vec<&'static str>,
    pub(crate) value_label: &'static str,
    pub(crate) reducer: Reducer,
    pub(crate) rows: Vec<SectionRow>,
    pub(crate) unclassified: GroupStat,
    pub(crate) dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pivot: Option<Pivot<String, String>>,
}

impl Section {
    pub fn id(&self) -> &str {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn key_labels(&self) -> &[&'static str] {
        &self.key_labels
    }

    pub fn value_label(&self) -> &str {
        self.value_label
    }

    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    pub fn rows(&self) -> &[SectionRow] {
        &self.rows
    }

    pub fn unclassified(&self) -> GroupStat {
        self.unclassified
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn pivot(&self) -> Option<&Pivot<String, String>> {
        self.pivot.as_ref()
    }

    /// Looks a row up by its rendered key.
    pub fn row(&self, key: &[&str]) -> Option<&SectionRow> {
        self.rows
            .iter()
            .find(|r| r.key.len() == key.len() && r.key.iter().zip(key).all(|(a, b)| a == b))
    }
}

/// Every section of one run over a dataset.
#[derive(Debug, Clone, Serialize)]
pub struct LoanReport {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) source: String,
    pub(crate) records: usize,
    pub(crate) sections: Vec<Section>,
}

impl LoanReport {
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}
