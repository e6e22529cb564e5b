//! Filter records by date range and sender.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering record collections.
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Records on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Records on or before date |
//! | Sender | [`with_sender`](FilterConfig::with_sender) | Records from one auditor |
//!
//! # Example
//!
//! ```
//! use auditpack::core::filter::{FilterConfig, apply_filters};
//! use auditpack::parser::AuditParser;
//!
//! # fn main() -> auditpack::Result<()> {
//! let records = AuditParser::new().parse_str(
//!     "31/7/2024, 16:00 - Alice:\nLOC: K6\n\
//!      1/8/2024, 09:15 - Bob:\nLOC: K7",
//! );
//!
//! let config = FilterConfig::new().with_date_from("2024-08-01")?;
//! let filtered = apply_filters(records, &config);
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].loc, "K7");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Records whose header date could not be parsed are **excluded** when date
//!   filters are active
//! - Sender matching is case-insensitive
//! - Multiple filters are combined with AND logic

use chrono::NaiveDate;

use crate::error::{AuditpackError, Result};
use crate::record::ParsedRecord;

/// Configuration for filtering records by date and sender.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Include only records on or after this date.
    pub after: Option<NaiveDate>,

    /// Include only records on or before this date.
    pub before: Option<NaiveDate>,

    /// Include only records from this sender (case-insensitive).
    pub from: Option<String>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self> {
        self.after = Some(parse_date(date_str)?);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self> {
        self.before = Some(parse_date(date_str)?);
        Ok(self)
    }

    /// Sets the sender filter.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.from = Some(sender.into());
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some() || self.before.is_some() || self.from.is_some()
    }

    /// Returns `true` if date filters are active.
    pub fn has_date_filter(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Returns `true` if `record` passes every active filter.
    pub fn matches(&self, record: &ParsedRecord) -> bool {
        if let Some(from) = &self.from {
            if record.sender.to_lowercase() != from.to_lowercase() {
                return false;
            }
        }

        if self.has_date_filter() {
            let Some(date) = record.datetime.map(|dt| dt.date()) else {
                return false;
            };
            if self.after.is_some_and(|after| date < after) {
                return false;
            }
            if self.before.is_some_and(|before| date > before) {
                return false;
            }
        }

        true
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|_| AuditpackError::invalid_date(date_str))
}

/// Keeps only the records that match all active filters.
pub fn apply_filters(records: Vec<ParsedRecord>, config: &FilterConfig) -> Vec<ParsedRecord> {
    if !config.is_active() {
        return records;
    }

    let before = records.len();
    let kept: Vec<_> = records.into_iter().filter(|r| config.matches(r)).collect();
    tracing::debug!(before, after = kept.len(), "applied filters");
    kept
}
