//! Loan records and the fields derived from them.

use serde::{Deserialize, Serialize};

use crate::tiers::{BalanceTier, Category, CreditTier, DtiTier, IncomeTier, Purpose, Tier};

/// Number of columns in the loan dataset.
pub const COLUMN_COUNT: usize = 14;

/// Column titles, in file order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Credit Policy",
    "Purpose of Loan",
    "Interest Rate",
    "Installment",
    "Annual Income (raw)",
    "Debt to Income",
    "FICO Score",
    "Days with Credit",
    "Revolving Balances",
    "Revolving Limits",
    "Inquiries (Last 6 Months)",
    "Delinquent (Last 24 months)",
    "Public Records (Bankruptcy, tax liens or judgements)",
    "Not Fully Paid",
];

/// One loan application, deserialized by column position.
///
/// Empty cells become `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub credit_policy: Option<u8>,
    pub purpose: Option<String>,
    pub interest_rate: Option<f64>,
    pub installment: Option<f64>,
    /// Natural log of the self-reported annual income.
    pub log_annual_income: Option<f64>,
    pub debt_to_income: Option<f64>,
    pub fico_score: Option<f64>,
    pub days_with_credit: Option<f64>,
    pub revolving_balance: Option<f64>,
    pub revolving_utilization: Option<f64>,
    pub inquiries_last_6m: Option<u32>,
    pub delinquencies_2y: Option<u32>,
    pub public_records: Option<u32>,
    pub not_fully_paid: Option<u8>,
}

impl LoanRecord {
    /// The outcome as a 0/1 number, for averaging.
    pub fn outcome(&self) -> Option<f64> {
        self.not_fully_paid.map(f64::from)
    }
}

/// Fields computed once per record at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Derived {
    /// Annual income in whole dollars.
    pub annual_income: Option<f64>,
    pub credit_tier: Option<CreditTier>,
    pub income_tier: Option<IncomeTier>,
    pub dti_tier: Option<DtiTier>,
    pub balance_tier: Option<BalanceTier>,
    pub purpose: Option<Purpose>,
}

impl Derived {
    pub fn from_record(record: &LoanRecord) -> Self {
        let annual_income = record
            .log_annual_income
            .map(|log| log.exp().round_ties_even())
            .filter(|v| v.is_finite());

        Derived {
            annual_income,
            credit_tier: CreditTier::classify(record.fico_score),
            income_tier: IncomeTier::classify(annual_income),
            dti_tier: DtiTier::classify(record.debt_to_income),
            balance_tier: BalanceTier::classify(record.revolving_balance),
            purpose: record.purpose.as_deref().and_then(Purpose::from_label),
        }
    }
}

/// A record viewed together with its derived fields.
#[derive(Debug, Clone, Copy)]
pub struct LoanRow<'a> {
    pub record: &'a LoanRecord,
    pub derived: &'a Derived,
}

/// Loaded records plus their derived lookup, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LoanRecord>,
    derived: Vec<Derived>,
}

impl Dataset {
    pub fn new(records: Vec<LoanRecord>) -> Self {
        let derived = records.iter().map(Derived::from_record).collect();
        Self { records, derived }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LoanRecord] {
        &self.records
    }

    pub fn rows(&self) -> Vec<LoanRow<'_>> {
        self.records
            .iter()
            .zip(&self.derived)
            .map(|(record, derived)| LoanRow { record, derived })
            .collect()
    }
}
