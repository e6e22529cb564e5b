//! Post-processing of parsed records.
//!
//! This module contains:
//! - [`models`] - Output configuration
//! - [`filter`] - Record filtering by date and sender
//! - [`processor`] - Parse statistics
//! - [`output`] - Format writers (CSV, JSON, JSONL)

pub mod filter;
pub mod models;
pub mod output;
pub mod processor;

pub use filter::{FilterConfig, apply_filters};
pub use models::OutputConfig;
pub use processor::ParseStats;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
