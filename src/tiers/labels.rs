//! Label sets for every grouping dimension.
//!
//! Each dimension is a plain enum. Its ordering is the `ORDER` table, not the
//! declaration order, and numeric dimensions also carry their `BOUNDARIES`.

use std::fmt;
use std::hash::Hash;

use serde::{Serialize, Serializer};

use super::bins::{BinSpec, locate};
use crate::error::BinSpecError;

/// A closed, ordered set of labels.
pub trait Category: Copy + Eq + Hash + Ord + fmt::Debug + 'static {
    /// Human-readable name of the dimension, used as a column header.
    const TITLE: &'static str;

    /// Every label of the dimension in report order.
    const ORDER: &'static [Self];

    fn label(self) -> &'static str;

    /// Looks a label up by its text. Surrounding whitespace is ignored.
    fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ORDER.iter().copied().find(|c| c.label() == text)
    }
}

/// A category derived from a continuous value through fixed bin edges.
///
/// `BOUNDARIES.len()` is always `ORDER.len() + 1`.
pub trait Tier: Category {
    const BOUNDARIES: &'static [f64];

    /// Maps `value` onto its tier. Missing, NaN and out-of-range values have
    /// no tier.
    fn classify(value: Option<f64>) -> Option<Self> {
        locate(Self::BOUNDARIES, value).and_then(|i| Self::ORDER.get(i).copied())
    }

    /// Runtime bin spec for this dimension.
    fn bin_spec() -> Result<BinSpec<Self>, BinSpecError> {
        BinSpec::new(Self::BOUNDARIES.to_vec(), Self::ORDER.to_vec())
    }
}

macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, $title:expr, {
            $($variant:ident => $label:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl Category for $name {
            const TITLE: &'static str = $title;
            const ORDER: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

category! {
    /// FICO score band.
    CreditTier, "FICO Tier", {
        Poor => "Poor",
        Fair => "Fair",
        Good => "Good",
        VeryGood => "Very Good",
        Excellent => "Excellent",
    }
}

impl Tier for CreditTier {
    const BOUNDARIES: &'static [f64] = &[300.0, 580.0, 670.0, 740.0, 800.0, 900.0];
}

category! {
    /// Annual income band, in dollars.
    IncomeTier, "Income Tier", {
        Under25K => "0-25K",
        From25To50K => "25-50K",
        From50To75K => "50-75K",
        From75To100K => "75-100K",
        From100To125K => "100-125K",
        Over125K => "125K+",
    }
}

impl Tier for IncomeTier {
    const BOUNDARIES: &'static [f64] = &[
        0.0, 25_000.0, 50_000.0, 75_000.0, 100_000.0, 125_000.0, 500_000.0,
    ];
}

category! {
    /// Debt-to-income ratio band, in percent.
    DtiTier, "DTI Tier", {
        Under20 => "0-20",
        From20To30 => "20-30",
        From30To40 => "30-40",
        From40To50 => "40-50",
        From50To60 => "50-60",
        Over60 => "60+",
    }
}

impl Tier for DtiTier {
    const BOUNDARIES: &'static [f64] = &[0.0, 20.0, 30.0, 40.0, 50.0, 60.0, f64::INFINITY];
}

category! {
    /// Revolving (credit card) balance band, in dollars.
    BalanceTier, "Credit Balance Tier", {
        Under5K => "0-5K",
        From5To10K => "5K-10K",
        From10To20K => "10K-20K",
        From20To40K => "20K-40K",
        Over40K => "40K+",
    }
}

impl Tier for BalanceTier {
    const BOUNDARIES: &'static [f64] = &[0.0, 5_000.0, 10_000.0, 20_000.0, 40_000.0, f64::INFINITY];
}

category! {
    /// Declared purpose of the loan, as spelled in the dataset.
    Purpose, "Purpose of Loan", {
        AllOther => "all_other",
        CreditCard => "credit_card",
        DebtConsolidation => "debt_consolidation",
        Educational => "educational",
        HomeImprovement => "home_improvement",
        MajorPurchase => "major_purchase",
        SmallBusiness => "small_business",
    }
}
