//! Line-streaming record iterator.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::processor::ParseStats;
use crate::error::Result;
use crate::parser::{AuditParser, RecordBuilder};
use crate::record::ParsedRecord;

/// Iterator that yields records as their blocks close.
///
/// Lines are read one at a time and decoded lossily, so memory use is bounded
/// by the longest line rather than the file size.
pub struct RecordIterator<R: BufRead> {
    reader: R,
    builder: RecordBuilder,
    buffer: Vec<u8>,
    bytes_read: u64,
    total_bytes: Option<u64>,
    finished: bool,
}

impl RecordIterator<BufReader<File>> {
    /// Opens a transcript file for streaming.
    pub fn open(path: &Path, parser: &AuditParser) -> Result<Self> {
        let file = File::open(path)?;
        let total = file.metadata()?.len();
        let reader = BufReader::with_capacity(parser.config().buffer_size, file);

        tracing::debug!(path = %path.display(), bytes = total, "streaming transcript");
        Ok(Self::new(reader, parser).with_total_bytes(total))
    }
}

impl<R: BufRead> RecordIterator<R> {
    /// Wraps any buffered reader.
    pub fn new(reader: R, parser: &AuditParser) -> Self {
        Self {
            reader,
            builder: parser.builder(),
            buffer: Vec::with_capacity(4096),
            bytes_read: 0,
            total_bytes: None,
            finished: false,
        }
    }

    /// Sets the input size used by [`progress`](Self::progress).
    #[must_use]
    pub fn with_total_bytes(mut self, total: u64) -> Self {
        self.total_bytes = Some(total);
        self
    }

    /// Returns approximate progress as a percentage (0.0 to 100.0).
    ///
    /// Returns `None` if the input size is unknown or zero.
    pub fn progress(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => Some((self.bytes_read as f64 / total as f64) * 100.0),
            _ => None,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the counters collected so far.
    pub fn stats(&self) -> ParseStats {
        self.builder.stats()
    }

    fn read_line(&mut self) -> std::io::Result<bool> {
        self.buffer.clear();
        let bytes = self.reader.read_until(b'\n', &mut self.buffer)?;
        self.bytes_read += bytes as u64;
        Ok(bytes > 0)
    }
}

impl<R: BufRead> Iterator for RecordIterator<R> {
    type Item = Result<ParsedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.read_line() {
                Ok(true) => {
                    let line = String::from_utf8_lossy(&self.buffer).into_owned();
                    if let Some(record) = self.builder.push_line(&line) {
                        return Some(Ok(record));
                    }
                }
                Ok(false) => {
                    self.finished = true;
                    return self.builder.finish().map(Ok);
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
