//! Output format writers.
//!
//! - [`write_csv`] / [`to_csv`] - spreadsheet rows, requires `csv-output`
//! - [`write_json`] / [`to_json`] - JSON array, requires `json-output`
//! - [`write_jsonl`] / [`to_jsonl`] - one JSON object per line, requires `json-output`
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> auditpack::Result<()> {
//! use auditpack::core::models::OutputConfig;
//! use auditpack::core::output::{to_csv, write_csv, write_jsonl};
//! use auditpack::parser::AuditParser;
//!
//! let records = AuditParser::new().parse("chat.txt".as_ref())?;
//! let config = OutputConfig::new();
//!
//! write_csv(&records, "audit.csv", &config)?;
//! write_jsonl(&records, "audit.jsonl", &config)?;
//!
//! let csv_string = to_csv(&records, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
