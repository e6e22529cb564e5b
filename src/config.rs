//! Configuration types for parsing and photo resolution.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ParserConfig`] - transcript parsing settings
//! - [`ResolverConfig`] - fuzzy image matching settings
//!
//! Output settings live in [`OutputConfig`](crate::core::models::OutputConfig).
//!
//! # Example
//!
//! ```rust
//! use auditpack::config::ParserConfig;
//! use auditpack::parser::AuditParser;
//!
//! let config = ParserConfig::new()
//!     .with_remark_key("REMARKABLE")
//!     .with_media_omitted_marker("<berkas tidak disertakan>");
//!
//! let parser = AuditParser::with_config(config)?;
//! # Ok::<(), auditpack::AuditpackError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AuditpackError, Result};

/// Default pattern for WhatsApp-generated photo file names,
/// e.g. `IMG-20240801-WA0001.jpg` or `IMG-20240801-WA0001 (1).jpeg`.
pub const DEFAULT_IMAGE_PATTERN: &str = r"(?i)IMG-\d{8}-WA\d{4}.*?\.(?:jpg|jpeg|png)";

/// Default canonical name of the free-text remark column.
pub const DEFAULT_REMARK_KEY: &str = "REMARK";

/// Order of the day and month components in message headers.
///
/// The export locale decides whether `1/8/2024` means 1 August or 8 January.
/// The raw header text is kept either way; this only affects the parsed
/// timestamp used for date filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `D/M/Y` (most non-US locales)
    #[default]
    DayFirst,
    /// `M/D/Y` (US locale)
    MonthFirst,
}

impl DateOrder {
    /// Returns the chrono format for `"<date> <time>"` in this order.
    ///
    /// chrono's `%Y` also accepts `24` (as the year 24), so two-digit years
    /// must be routed to `%y` explicitly.
    pub(crate) fn parse_format(self, year_digits: usize) -> &'static str {
        match (self, year_digits) {
            (DateOrder::DayFirst, 2) => "%d/%m/%y %H:%M",
            (DateOrder::DayFirst, _) => "%d/%m/%Y %H:%M",
            (DateOrder::MonthFirst, 2) => "%m/%d/%y %H:%M",
            (DateOrder::MonthFirst, _) => "%m/%d/%Y %H:%M",
        }
    }
}

/// Configuration for transcript parsing.
///
/// # Example
///
/// ```rust
/// use auditpack::config::{DateOrder, ParserConfig};
///
/// let config = ParserConfig::new()
///     .with_date_order(DateOrder::MonthFirst)
///     .with_scan_header_remainder(false);
/// assert_eq!(config.remark_key, "REMARK");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Canonical name the remark variants normalize to (default: `REMARK`)
    pub remark_key: String,

    /// Regex matching photo file names referenced in the transcript
    pub image_pattern: String,

    /// Case-insensitive markers meaning an attachment was not exported
    pub media_omitted_markers: Vec<String>,

    /// Scan the text after `Sender:` on a header line (default: true)
    ///
    /// Photos, media markers and known columns are read; other labels there
    /// are ignored.
    pub scan_header_remainder: bool,

    /// Day/month order of header dates (default: day first)
    pub date_order: DateOrder,

    /// Buffer size for streaming reads (default: 64KB)
    pub buffer_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            remark_key: DEFAULT_REMARK_KEY.to_string(),
            image_pattern: DEFAULT_IMAGE_PATTERN.to_string(),
            media_omitted_markers: vec![
                "<media omitted>".to_string(),
                "<media tidak disertakan>".to_string(),
                "image omitted".to_string(),
            ],
            scan_header_remainder: true,
            date_order: DateOrder::default(),
            buffer_size: 64 * 1024, // 64KB
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canonical remark key. The value is upper-cased and trimmed.
    #[must_use]
    pub fn with_remark_key(mut self, key: impl Into<String>) -> Self {
        self.remark_key = key.into().trim().to_uppercase();
        self
    }

    /// Sets the photo file name pattern.
    #[must_use]
    pub fn with_image_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.image_pattern = pattern.into();
        self
    }

    /// Adds a media-omitted marker.
    #[must_use]
    pub fn with_media_omitted_marker(mut self, marker: impl Into<String>) -> Self {
        self.media_omitted_markers.push(marker.into());
        self
    }

    /// Sets whether known fields after `Sender:` on a header line are read.
    #[must_use]
    pub fn with_scan_header_remainder(mut self, enabled: bool) -> Self {
        self.scan_header_remainder = enabled;
        self
    }

    /// Sets the header date order.
    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    /// Sets the buffer size for streaming.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

/// Configuration for matching referenced photo names against the bundle.
///
/// # Example
///
/// ```rust
/// use auditpack::config::ResolverConfig;
///
/// let config = ResolverConfig::new().with_threshold(0.8)?;
/// assert_eq!(config.threshold, 0.8);
///
/// assert!(ResolverConfig::new().with_threshold(1.5).is_err());
/// # Ok::<(), auditpack::AuditpackError>(())
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum similarity (0.0 - 1.0) for a fuzzy match (default: 0.5)
    pub threshold: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl ResolverConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the similarity threshold.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::InvalidConfig`] unless `0.0 <= threshold <= 1.0`.
    pub fn with_threshold(mut self, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AuditpackError::invalid_config(
                "threshold",
                format!("{threshold} is not within 0.0..=1.0"),
            ));
        }
        self.threshold = threshold;
        Ok(self)
    }
}
