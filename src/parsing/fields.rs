//! Field label normalization.
//!
//! Audit messages are typed by hand, so the same column shows up as
//! `QTY`, `Qty Act`, `QTY ACTUAL`, `Remark(s)`, `S/N` and so on. The
//! [`FieldNormalizer`] folds those variants onto one canonical key per column.
//! Labels it does not know are returned unchanged.

use crate::record::{BIN, LOC, PN, QTY_ACTUAL, QTY_EMRO, SN};

/// Maps raw field labels onto canonical keys.
///
/// Matching ignores punctuation and whitespace, so `REMARK(S)`, `REMARKS`
/// and `REMARK S` all hit the same entry.
///
/// # Example
///
/// ```rust
/// use auditpack::parsing::FieldNormalizer;
///
/// let normalizer = FieldNormalizer::new("REMARK");
/// assert_eq!(normalizer.normalize("QTY ACT"), "QTY ACTUAL");
/// assert_eq!(normalizer.normalize("REMARK(S)"), "REMARK");
/// assert_eq!(normalizer.normalize("SHELF"), "SHELF");
/// ```
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    remark_key: String,
    remark_compact: String,
}

impl FieldNormalizer {
    /// Creates a normalizer whose remark variants map to `remark_key`.
    pub fn new(remark_key: impl Into<String>) -> Self {
        let remark_key = remark_key.into();
        let remark_compact = compact(&remark_key);
        Self {
            remark_key,
            remark_compact,
        }
    }

    /// Returns the canonical remark key.
    pub fn remark_key(&self) -> &str {
        &self.remark_key
    }

    /// Returns the canonical key for an upper-cased, trimmed label.
    pub fn normalize<'a>(&'a self, label: &'a str) -> &'a str {
        let key = compact(label);

        if let Some(canonical) = canonical_for(&key) {
            return canonical;
        }

        if key == "REMARK" || key == "REMARKS" || key == self.remark_compact {
            return &self.remark_key;
        }

        label
    }

    /// Returns `true` if `label` maps to a canonical column or the remark key.
    pub fn is_known(&self, label: &str) -> bool {
        let key = compact(label);
        canonical_for(&key).is_some()
            || key == "REMARK"
            || key == "REMARKS"
            || key == self.remark_compact
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REMARK_KEY)
    }
}

fn canonical_for(key: &str) -> Option<&'static str> {
    let canonical = match key {
        "LOC" | "LOCATION" => LOC,
        "BIN" => BIN,
        "PN" | "PARTNO" | "PARTNUMBER" => PN,
        "SN" | "SERIALNO" | "SERIALNUMBER" => SN,
        "QTYEMRO" => QTY_EMRO,
        "QTY" | "QTYACT" | "QTYACTUAL" => QTY_ACTUAL,
        _ => return None,
    };
    Some(canonical)
}

/// Strips everything but letters and digits.
fn compact(label: &str) -> String {
    label.chars().filter(|c| c.is_alphanumeric()).collect()
}
