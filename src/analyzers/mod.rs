//! Grouped aggregation and the loan report.
//!
//! Records are partitioned by tier (or raw count) keys, each partition is
//! reduced to a rate, mean or count, and the results are emitted as ordered
//! rows ready for a presentation layer.

pub mod aggregate;
pub mod analyzer;
pub mod pivot;
pub mod report;
pub mod types;
pub mod utility;
