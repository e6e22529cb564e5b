//! JSON Lines (JSONL) output writer.
//!
//! One record per line, which suits appending and line-oriented tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::json_writer::JsonRecord;
use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::record::ParsedRecord;

/// Writes records to a JSONL file.
///
/// ```jsonl
/// {"timestamp":"1/8/2024 09:15","sender":"Alice","loc":"K7",...}
/// {"timestamp":"1/8/2024 09:20","sender":"Bob","loc":"K8",...}
/// ```
pub fn write_jsonl(
    records: &[ParsedRecord],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);

    for record in records {
        serde_json::to_writer(&mut writer, &JsonRecord::new(record, config))?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts records to a JSONL string.
pub fn to_jsonl(records: &[ParsedRecord], config: &OutputConfig) -> Result<String> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(&JsonRecord::new(record, config))?);
        output.push('\n');
    }
    Ok(output)
}
