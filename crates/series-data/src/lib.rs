//! Extraction pipeline for the throughput series extractor.
//!
//! Opens a batch of per-trial server logs, recovers each trial's
//! established session, accumulates the per-second transfers into one
//! series per interface and writes the series out.

pub mod aggregator;
pub mod analysis;
pub mod parser;
pub mod reader;

#[cfg(test)]
mod fixtures;

pub use series_core as core;
