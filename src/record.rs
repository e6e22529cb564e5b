//! Finalized stock-audit records.
//!
//! A [`ParsedRecord`] is the immutable output of the transcript parser: one per
//! chat message that carried a location (`LOC`) field. All canonical fields are
//! plain strings, so quantities like `"46 (adjusted)"` survive untouched.
//!
//! # Example
//!
//! ```
//! use auditpack::ParsedRecord;
//!
//! let record = ParsedRecord::new("1/8/2024 09:15", "Alice")
//!     .with_field("LOC", "K7")
//!     .with_field("QTY ACTUAL", "47");
//!
//! assert_eq!(record.loc, "K7");
//! assert_eq!(record.qty_actual, "47");
//! assert!(!record.has_photo());
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical location key. A block without it is never emitted.
pub const LOC: &str = "LOC";
/// Canonical bin key.
pub const BIN: &str = "BIN";
/// Canonical part number key.
pub const PN: &str = "PN";
/// Canonical serial number key.
pub const SN: &str = "SN";
/// Canonical system-recorded quantity key.
pub const QTY_EMRO: &str = "QTY EMRO";
/// Canonical physically-counted quantity key.
pub const QTY_ACTUAL: &str = "QTY ACTUAL";

/// Link written when a record references no photo.
pub const LINK_NO_IMAGE: &str = "-";
/// Link written when the referenced photo is not in the bundle.
pub const LINK_NOT_FOUND: &str = "NOT FOUND";

/// One stock-audit entry extracted from a chat message.
///
/// | Field | Source |
/// |-------|--------|
/// | `timestamp` | header `D/M/Y H:MM`, verbatim |
/// | `sender` | header sender |
/// | `loc` .. `remark` | canonical fields, empty when absent |
/// | `photo_file` | last referenced photo name in the block |
/// | `photo_link` | filled by [`export`](crate::export), empty after parsing |
/// | `extra` | any other `Key: Value` lines |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Header date and time, e.g. `1/8/2024 09:15`.
    pub timestamp: String,

    /// Header timestamp parsed according to the configured date order.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub datetime: Option<NaiveDateTime>,

    /// Message author.
    pub sender: String,

    /// Location code.
    pub loc: String,
    /// Bin code.
    pub bin: String,
    /// Part number.
    pub pn: String,
    /// Serial number.
    pub sn: String,
    /// System-recorded quantity, as written.
    pub qty_emro: String,
    /// Physically-counted quantity, as written.
    pub qty_actual: String,
    /// Free-text remark.
    pub remark: String,

    /// Referenced photo file name, empty if none.
    pub photo_file: String,

    /// Shareable link to the stored photo, or a sentinel.
    pub photo_link: String,

    /// Unrecognized fields, keyed by their upper-cased label.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl ParsedRecord {
    /// Creates an empty record with header metadata.
    pub fn new(timestamp: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            ..Self::default()
        }
    }

    /// Builder-style method to set a field by canonical key.
    ///
    /// Keys other than the six fixed ones and `REMARK` go to [`extra`](Self::extra).
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match key {
            LOC => self.loc = value,
            BIN => self.bin = value,
            PN => self.pn = value,
            SN => self.sn = value,
            QTY_EMRO => self.qty_emro = value,
            QTY_ACTUAL => self.qty_actual = value,
            crate::config::DEFAULT_REMARK_KEY => self.remark = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
        self
    }

    /// Builder-style method to set the referenced photo.
    #[must_use]
    pub fn with_photo(mut self, file: impl Into<String>) -> Self {
        self.photo_file = file.into();
        self
    }

    /// Builder-style method to set the parsed timestamp.
    #[must_use]
    pub fn with_datetime(mut self, datetime: NaiveDateTime) -> Self {
        self.datetime = Some(datetime);
        self
    }

    /// Returns `true` if the record references a photo.
    pub fn has_photo(&self) -> bool {
        !self.photo_file.is_empty()
    }

    /// Returns the date part of the header timestamp (`1/8/2024`).
    pub fn date(&self) -> &str {
        self.timestamp.split(' ').next().unwrap_or_default()
    }

    /// Returns the canonical fields in column order.
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.loc,
            &self.bin,
            &self.pn,
            &self.sn,
            &self.qty_emro,
            &self.qty_actual,
            &self.remark,
        ]
    }
}
