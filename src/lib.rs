//! Composite indicator scores for municipalities.
//!
//! Single-metric CSV tables are merged on shared key columns into one table,
//! scored row by row with a pluggable [`scoring::ScoringStrategy`] and written
//! back out as CSV by [`processor::TableProcessor`].

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod processor;
pub mod scoring;

pub use error::{ProcessorError, Result};
pub use processor::TableProcessor;
