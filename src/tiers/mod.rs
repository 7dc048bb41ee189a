//! Tier classification.
//!
//! Continuous borrower attributes are mapped onto fixed, ordered label sets.
//! [`BinSpec`] is the runtime form of a binning; the dimension enums in
//! [`labels`] carry their boundaries and ordering tables as constants.

pub mod bins;
pub mod labels;

pub use bins::{BinSpec, locate};
pub use labels::{BalanceTier, Category, CreditTier, DtiTier, IncomeTier, Purpose, Tier};
