//! Output format selection.
//!
//! Library-level format type with no CLI framework dependency.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> auditpack::Result<()> {
//! use auditpack::core::models::OutputConfig;
//! use auditpack::format::{OutputFormat, to_format_string};
//! use auditpack::ParsedRecord;
//!
//! let records = vec![ParsedRecord::new("1/8/2024 09:15", "Alice").with_field("LOC", "K7")];
//!
//! let format = OutputFormat::from_path("audit.jsonl".as_ref())?;
//! assert_eq!(format, OutputFormat::Jsonl);
//!
//! let jsonl = to_format_string(&records, format, &OutputConfig::new())?;
//! assert!(jsonl.contains("\"loc\":\"K7\""));
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::error::{AuditpackError, Result};
use crate::record::ParsedRecord;

/// Output format for the audit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Spreadsheet rows, opens directly in Excel or LibreOffice
    #[default]
    Csv,

    /// JSON array of records
    Json,

    /// JSON Lines, one record per line
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Detects the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::InvalidConfig`] for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        ext.parse().map_err(|_| {
            AuditpackError::invalid_config(
                "format",
                format!("unknown file extension '.{ext}', expected one of: csv, json, jsonl"),
            )
        })
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

fn missing_feature(format: OutputFormat) -> AuditpackError {
    let feature = match format {
        OutputFormat::Csv => "csv-output",
        OutputFormat::Json | OutputFormat::Jsonl => "json-output",
    };
    AuditpackError::invalid_config(
        "format",
        format!("{format} output requires the '{feature}' feature"),
    )
}

/// Writes records to a file in the given format.
///
/// # Errors
///
/// Returns an error if the format's feature is disabled or the file cannot
/// be written.
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[ParsedRecord],
    path: &Path,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<()> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(records, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(records, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(records, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Converts records to a string in the given format.
#[allow(unused_variables)]
pub fn to_format_string(
    records: &[ParsedRecord],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(records, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(records, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(records, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}
