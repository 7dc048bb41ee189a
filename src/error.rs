//! Typed errors raised by the library.

use thiserror::Error;

/// Reasons a [`crate::tiers::BinSpec`] can be rejected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinSpecError {
    #[error("a bin spec needs at least two boundaries, got {0}")]
    TooFewBoundaries(usize),

    #[error("expected {expected} labels for {boundaries} boundaries, got {labels}")]
    LabelCount {
        boundaries: usize,
        labels: usize,
        expected: usize,
    },

    #[error("boundary {index} is NaN")]
    NanBoundary { index: usize },

    #[error("boundaries must be strictly increasing: {previous} at {index} is followed by {next}")]
    NotIncreasing {
        index: usize,
        previous: f64,
        next: f64,
    },
}
