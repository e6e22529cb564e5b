//! JSON output writer.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::record::ParsedRecord;

/// Record shape written by the JSON and JSONL writers.
#[derive(Serialize)]
pub(super) struct JsonRecord<'a> {
    timestamp: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<&'a str>,
    loc: &'a str,
    bin: &'a str,
    pn: &'a str,
    sn: &'a str,
    qty_emro: &'a str,
    qty_actual: &'a str,
    remark: &'a str,
    photo_file: &'a str,
    photo_link: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra: Option<&'a BTreeMap<String, String>>,
}

impl<'a> JsonRecord<'a> {
    pub(super) fn new(record: &'a ParsedRecord, config: &OutputConfig) -> Self {
        Self {
            timestamp: &record.timestamp,
            datetime: record
                .datetime
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:00").to_string()),
            sender: config.include_sender.then_some(record.sender.as_str()),
            loc: &record.loc,
            bin: &record.bin,
            pn: &record.pn,
            sn: &record.sn,
            qty_emro: &record.qty_emro,
            qty_actual: &record.qty_actual,
            remark: &record.remark,
            photo_file: &record.photo_file,
            photo_link: &record.photo_link,
            extra: (config.include_extra_fields && !record.extra.is_empty())
                .then_some(&record.extra),
        }
    }
}

/// Writes records to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {"timestamp": "1/8/2024 09:15", "sender": "Alice", "loc": "K7", ...}
/// ]
/// ```
pub fn write_json(
    records: &[ParsedRecord],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let json = to_json(records, config)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Converts records to a JSON array string.
pub fn to_json(records: &[ParsedRecord], config: &OutputConfig) -> Result<String> {
    let rows: Vec<JsonRecord<'_>> = records.iter().map(|r| JsonRecord::new(r, config)).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn records() -> Vec<ParsedRecord> {
        vec![
            ParsedRecord::new("1/8/2024 09:15", "Alice")
                .with_field("LOC", "K7")
                .with_field("QTY ACTUAL", "47")
                .with_field("SHELF", "3"),
        ]
    }

    #[test]
    fn test_to_json_basic() {
        let json = to_json(&records(), &OutputConfig::new()).unwrap();

        assert!(json.contains(r#""sender": "Alice""#));
        assert!(json.contains(r#""loc": "K7""#));
        assert!(json.contains(r#""qty_actual": "47""#));
        assert!(!json.contains("extra"));
        assert!(!json.contains("datetime"));
    }

    #[test]
    fn test_to_json_options() {
        let config = OutputConfig::new().without_sender().with_extra_fields();
        let json = to_json(&records(), &config).unwrap();

        assert!(!json.contains("sender"));
        assert!(json.contains(r#""SHELF": "3""#));
    }

    #[test]
    fn test_write_json_parses_back() {
        let file = NamedTempFile::new().unwrap();
        write_json(&records(), file.path(), &OutputConfig::new()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["photo_link"], "");
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(to_json(&[], &OutputConfig::new()).unwrap(), "[]");
    }
}
