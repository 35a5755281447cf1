//! Shared vocabulary for the throughput series extractor.
//!
//! Holds the error type, the column layout of the server logs, the
//! interface table and CLI settings, and the models passed between the
//! loading, parsing and aggregation stages.

pub mod error;
pub mod formatting;
pub mod layout;
pub mod models;
pub mod settings;

pub use error::{Result, SeriesError};
