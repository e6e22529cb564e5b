//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//!
//! Library callers should use [`format::OutputFormat`](crate::format::OutputFormat);
//! the CLI type converts into it.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{DateOrder, ParserConfig, ResolverConfig};
use crate::core::filter::FilterConfig;
use crate::core::models::OutputConfig;
use crate::error::{AuditpackError, Result};
use crate::logging::{LogConfig, LogFormat};

/// Default output file stem; the extension follows `--format`.
pub const DEFAULT_OUTPUT_STEM: &str = "audit_records";

/// Extract stock-audit records from a WhatsApp chat export
/// into a spreadsheet, with links to the referenced photos.
#[derive(Parser, Debug, Clone)]
#[command(name = "auditpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    auditpack export.zip
    auditpack export.zip -o audit.csv --photos-dir photos
    auditpack chat.txt --format jsonl --after 2024-08-01
    auditpack export/ --photos-dir /srv/www/audit --base-url https://files.example.com/audit
    auditpack export.zip --upload-url https://storage.example.com/bucket --remark-key REMARKABLE")]
pub struct Args {
    /// Chat export: a .zip archive, an extracted directory or a .txt transcript
    pub input: PathBuf,

    /// Path to output file [default: audit_records.<format>]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Canonical name of the remark column
    #[arg(long, value_name = "KEY", default_value = crate::config::DEFAULT_REMARK_KEY)]
    pub remark_key: String,

    /// Minimum similarity (0.0 - 1.0) for fuzzy photo matching
    #[arg(long, value_name = "T", default_value_t = 0.5)]
    pub threshold: f64,

    /// Copy referenced photos into this directory and link them
    #[arg(long, value_name = "DIR", conflicts_with = "upload_url")]
    pub photos_dir: Option<PathBuf>,

    /// Public URL prefix for photos copied with --photos-dir
    #[arg(long, value_name = "URL", requires = "photos_dir")]
    pub base_url: Option<String>,

    /// Upload referenced photos with HTTP PUT under this URL
    #[arg(long, value_name = "URL")]
    pub upload_url: Option<String>,

    /// Keep records on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep records on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep records from this sender only
    #[arg(long, value_name = "USER")]
    pub from: Option<String>,

    /// Header dates are month first (M/D/Y)
    #[arg(long)]
    pub month_first: bool,

    /// CSV field delimiter
    #[arg(long, value_name = "C", default_value_t = ',')]
    pub delimiter: char,

    /// Include unrecognized fields in JSON output
    #[arg(long)]
    pub extra_fields: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Args {
    /// Returns the output path, defaulting to `audit_records.<ext>`.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let format: crate::format::OutputFormat = self.format.into();
            PathBuf::from(format!("{DEFAULT_OUTPUT_STEM}.{}", format.extension()))
        })
    }

    /// Builds the parser configuration.
    pub fn parser_config(&self) -> ParserConfig {
        let order = if self.month_first {
            DateOrder::MonthFirst
        } else {
            DateOrder::DayFirst
        };
        ParserConfig::new()
            .with_remark_key(&self.remark_key)
            .with_date_order(order)
    }

    /// Builds the resolver configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold is outside `0.0..=1.0`.
    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        ResolverConfig::new().with_threshold(self.threshold)
    }

    /// Builds the record filter.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not `YYYY-MM-DD`.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let mut filter = FilterConfig::new();
        if let Some(ref after) = self.after {
            filter = filter.with_date_from(after)?;
        }
        if let Some(ref before) = self.before {
            filter = filter.with_date_to(before)?;
        }
        if let Some(ref from) = self.from {
            filter = filter.with_sender(from.clone());
        }
        Ok(filter)
    }

    /// Builds the output configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the delimiter is not a single-byte character.
    pub fn output_config(&self) -> Result<OutputConfig> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                AuditpackError::invalid_config(
                    "delimiter",
                    format!("'{}' is not an ASCII character", self.delimiter),
                )
            })?;

        let mut config = OutputConfig::new()
            .with_delimiter(delimiter)
            .with_remark_header(self.parser_config().remark_key);
        if self.extra_fields {
            config = config.with_extra_fields();
        }
        Ok(config)
    }

    /// Builds the logging configuration.
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_verbosity(self.verbose, self.quiet).with_format(self.log_format)
    }
}

/// Output format options.
///
/// - [`Csv`](OutputFormat::Csv) - Spreadsheet rows (default)
/// - [`Json`](OutputFormat::Json) - Structured array, good for APIs
/// - [`Jsonl`](OutputFormat::Jsonl) - One JSON per line, good for pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// CSV spreadsheet (default)
    #[default]
    Csv,

    /// JSON array of records
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}
