//! CSV spreadsheet writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::record::ParsedRecord;

/// Writes records to a CSV spreadsheet, one row per record.
///
/// # Format
/// - Delimiter: from [`OutputConfig::delimiter`] (default `,`)
/// - Columns: `Timestamp`, `Sender`, `LOC`, `BIN`, `PN`, `SN`, `Qty EMRO`,
///   `Qty ACTUAL`, remark, `Photo File`, `Photo Link`
/// - Encoding: UTF-8
pub fn write_csv(
    records: &[ParsedRecord],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let file = File::create(output_path)?;
    write_rows(file, records, config)
}

/// Converts records to a CSV string.
pub fn to_csv(records: &[ParsedRecord], config: &OutputConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, records, config)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_rows<W: Write>(sink: W, records: &[ParsedRecord], config: &OutputConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_writer(sink);

    writer.write_record(build_header(config))?;
    for record in records {
        writer.write_record(build_record(record, config))?;
    }

    writer.flush()?;
    Ok(())
}

fn build_header(config: &OutputConfig) -> Vec<&str> {
    let mut header = vec!["Timestamp"];
    if config.include_sender {
        header.push("Sender");
    }
    header.extend([
        "LOC",
        "BIN",
        "PN",
        "SN",
        "Qty EMRO",
        "Qty ACTUAL",
        config.remark_header.as_str(),
        "Photo File",
        "Photo Link",
    ]);
    header
}

fn build_record<'a>(record: &'a ParsedRecord, config: &OutputConfig) -> Vec<&'a str> {
    let mut row = vec![record.timestamp.as_str()];
    if config.include_sender {
        row.push(&record.sender);
    }
    row.extend(record.fields());
    row.push(&record.photo_file);
    row.push(&record.photo_link);
    row
}
