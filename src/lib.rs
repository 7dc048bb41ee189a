//! Tiered default-rate analysis of loan applications.
//!
//! Records are loaded from CSV ([`parser`]), borrowers are bucketed into
//! ordered tiers ([`tiers`]), records are grouped and reduced per tier
//! ([`analyzers`]), and the results are rendered or persisted ([`output`]).

pub mod analyzers;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod record;
pub mod tiers;
