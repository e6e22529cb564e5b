//! Record builder and the transcript parser.
//!
//! Parsing is a fold over transcript lines. [`RecordBuilder::transition`]
//! takes the current [`BuilderState`] and one line and returns the next state
//! together with any record the line closed. [`RecordBuilder::push_line`]
//! threads that state for callers that feed lines one at a time, and
//! [`AuditParser`] wraps the whole pass for files, strings and bytes.
//!
//! Parsing never fails: unknown lines are ignored and blocks without a `LOC`
//! value are discarded. Only reading a file can return an error.
//!
//! # Example
//!
//! ```rust
//! use auditpack::parser::AuditParser;
//!
//! let transcript = "\
//! 1/8/2024, 09:15 - Alice:
//! LOC: K7
//! QTY: 10
//! QTY ACT: 12
//! IMG-20240801-WA0001.jpg (file attached)";
//!
//! let records = AuditParser::new().parse_str(transcript);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].qty_actual, "12");
//! assert_eq!(records[0].photo_file, "IMG-20240801-WA0001.jpg");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::{DateOrder, ParserConfig};
use crate::core::processor::ParseStats;
use crate::error::Result;
use crate::parsing::{FieldNormalizer, LineKind, MessageHeader, Segmenter};
use crate::record::{LOC, ParsedRecord};

#[cfg(feature = "streaming")]
use crate::streaming::RecordIterator;

/// Accumulator for the block that is currently open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InProgressRecord {
    /// `"<date> <time>"` from the header.
    pub timestamp: String,
    /// Parsed header timestamp, if the date is valid.
    pub datetime: Option<NaiveDateTime>,
    /// Header sender.
    pub sender: String,
    /// Canonical key to last-seen value.
    pub fields: BTreeMap<String, String>,
    /// Last referenced photo, cleared by a media-omitted marker.
    pub image: Option<String>,
}

impl InProgressRecord {
    fn open(header: &MessageHeader<'_>, order: DateOrder, image: Option<&str>) -> Self {
        Self {
            timestamp: header.timestamp(),
            datetime: header.datetime(order),
            sender: header.sender.to_string(),
            fields: BTreeMap::new(),
            image: image.map(str::to_string),
        }
    }

    /// Returns the trimmed `LOC` value, or `""`.
    pub fn loc(&self) -> &str {
        self.fields.get(LOC).map_or("", |v| v.trim())
    }

    /// Converts the block into a record, or `None` if it has no `LOC` value.
    ///
    /// `remark_key` names the canonical key that fills
    /// [`ParsedRecord::remark`].
    pub fn finalize(self, remark_key: &str) -> Option<ParsedRecord> {
        if self.loc().is_empty() {
            return None;
        }

        let mut record = ParsedRecord::new(self.timestamp, self.sender);
        record.datetime = self.datetime;
        record.photo_file = self.image.unwrap_or_default();

        for (key, value) in self.fields {
            if key == remark_key {
                record.remark = value;
            } else {
                record = record.with_field(&key, value);
            }
        }

        Some(record)
    }
}

/// Parse state threaded through the fold.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BuilderState {
    /// No header seen yet.
    #[default]
    Idle,
    /// A block is open.
    Accumulating(InProgressRecord),
}

impl BuilderState {
    /// Returns the open block, if any.
    pub fn current(&self) -> Option<&InProgressRecord> {
        match self {
            BuilderState::Idle => None,
            BuilderState::Accumulating(block) => Some(block),
        }
    }
}

/// What a single line did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEffect {
    /// A header opened a new block.
    Opened,
    /// The line updated the open block.
    Absorbed,
    /// A field, photo or media line arrived with no block open.
    Stray,
    /// Blank line, chatter or malformed header.
    Ignored,
}

/// Result of one [`RecordBuilder::transition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// State after the line.
    pub state: BuilderState,
    /// Block closed by this line, before LOC gating.
    pub closed: Option<InProgressRecord>,
    /// How the line was handled.
    pub effect: LineEffect,
}

/// Stateful record builder.
///
/// Feed lines with [`push_line`](Self::push_line) and call
/// [`finish`](Self::finish) at end of input. Stopping early is safe: every
/// record returned so far is complete.
///
/// # Example
///
/// ```rust
/// use auditpack::parser::AuditParser;
///
/// let mut builder = AuditParser::new().builder();
///
/// assert!(builder.push_line("1/8/2024, 09:15 - Alice:").is_none());
/// assert!(builder.push_line("LOC: K7").is_none());
///
/// let record = builder.finish().unwrap();
/// assert_eq!(record.loc, "K7");
/// assert_eq!(builder.stats().records, 1);
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    segmenter: Segmenter,
    normalizer: FieldNormalizer,
    date_order: DateOrder,
    scan_header_remainder: bool,
    state: BuilderState,
    stats: ParseStats,
}

impl RecordBuilder {
    /// Creates a builder from a parser configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::Pattern`](crate::AuditpackError::Pattern) if
    /// the configured image pattern does not compile.
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            segmenter: Segmenter::new(config)?,
            normalizer: FieldNormalizer::new(config.remark_key.clone()),
            date_order: config.date_order,
            scan_header_remainder: config.scan_header_remainder,
            state: BuilderState::Idle,
            stats: ParseStats::default(),
        })
    }

    /// Computes the next state for `line` without touching `self`.
    pub fn transition(&self, state: BuilderState, line: &str) -> Step {
        match self.segmenter.classify(line) {
            LineKind::MessageStart {
                header,
                image,
                rest,
            } => {
                let mut block = InProgressRecord::open(&header, self.date_order, image);
                if self.scan_header_remainder {
                    match self.segmenter.classify_continuation(rest) {
                        // Chatter or a colon in the sender name; only known columns count here.
                        LineKind::Field { label, .. } if !self.normalizer.is_known(&label) => {
                            tracing::trace!(label = %label, "ignored unknown field on header line");
                        }
                        remainder => self.absorb(&mut block, remainder),
                    }
                }

                let closed = match state {
                    BuilderState::Idle => None,
                    BuilderState::Accumulating(previous) => Some(previous),
                };

                Step {
                    state: BuilderState::Accumulating(block),
                    closed,
                    effect: LineEffect::Opened,
                }
            }
            LineKind::Other => Step {
                state,
                closed: None,
                effect: LineEffect::Ignored,
            },
            kind => match state {
                BuilderState::Idle => Step {
                    state,
                    closed: None,
                    effect: LineEffect::Stray,
                },
                BuilderState::Accumulating(mut block) => {
                    self.absorb(&mut block, kind);
                    Step {
                        state: BuilderState::Accumulating(block),
                        closed: None,
                        effect: LineEffect::Absorbed,
                    }
                }
            },
        }
    }

    fn absorb(&self, block: &mut InProgressRecord, kind: LineKind<'_>) {
        match kind {
            LineKind::ImageReference(name) => block.image = Some(name.to_string()),
            LineKind::MediaOmitted => block.image = None,
            LineKind::Field { label, value } => {
                let key = self.normalizer.normalize(&label).to_string();
                block.fields.insert(key, value.to_string());
            }
            LineKind::MessageStart { .. } | LineKind::Other => {}
        }
    }

    /// Feeds one line, returning the record it closed, if any.
    pub fn push_line(&mut self, line: &str) -> Option<ParsedRecord> {
        let line = if self.stats.lines == 0 {
            line.trim_start_matches('\u{feff}')
        } else {
            line
        };
        let state = std::mem::take(&mut self.state);
        let step = self.transition(state, line);

        self.stats.lines += 1;
        match step.effect {
            LineEffect::Opened => self.stats.blocks += 1,
            LineEffect::Stray => {
                self.stats.stray += 1;
                tracing::debug!(line = self.stats.lines, "dropped line outside any message");
            }
            LineEffect::Absorbed | LineEffect::Ignored => {}
        }

        self.state = step.state;
        step.closed.and_then(|block| self.close(block))
    }

    /// Closes the open block at end of input.
    ///
    /// The builder is left idle and can be reused.
    pub fn finish(&mut self) -> Option<ParsedRecord> {
        match std::mem::take(&mut self.state) {
            BuilderState::Idle => None,
            BuilderState::Accumulating(block) => self.close(block),
        }
    }

    fn close(&mut self, block: InProgressRecord) -> Option<ParsedRecord> {
        let timestamp = block.timestamp.clone();
        match block.finalize(self.normalizer.remark_key()) {
            Some(record) => {
                self.stats.records += 1;
                Some(record)
            }
            None => {
                self.stats.discarded += 1;
                tracing::debug!(%timestamp, "discarded message without LOC");
                None
            }
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Returns the counters collected so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

/// Parser for WhatsApp audit transcripts.
///
/// # Example
///
/// ```rust,no_run
/// use auditpack::config::ParserConfig;
/// use auditpack::parser::AuditParser;
///
/// let parser = AuditParser::with_config(ParserConfig::new().with_remark_key("REMARKABLE"))?;
/// let records = parser.parse("chat.txt".as_ref())?;
/// # Ok::<(), auditpack::AuditpackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AuditParser {
    config: ParserConfig,
    template: RecordBuilder,
}

impl AuditParser {
    /// Creates a parser with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
            .expect("default parser patterns are valid")
    }

    /// Creates a parser with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::Pattern`](crate::AuditpackError::Pattern) if
    /// the configured image pattern does not compile.
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        let template = RecordBuilder::new(&config)?;
        Ok(Self { config, template })
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns a fresh, idle builder.
    pub fn builder(&self) -> RecordBuilder {
        self.template.clone()
    }

    /// Parses a transcript file.
    ///
    /// Invalid UTF-8 is replaced, never rejected.
    pub fn parse(&self, path: &Path) -> Result<Vec<ParsedRecord>> {
        let bytes = fs::read(path)?;
        let (records, stats) = self.parse_bytes_with_stats(&bytes);
        tracing::info!(path = %path.display(), %stats, "parsed transcript");
        Ok(records)
    }

    /// Parses raw transcript bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Vec<ParsedRecord> {
        self.parse_bytes_with_stats(bytes).0
    }

    /// Parses raw transcript bytes and returns the counters as well.
    pub fn parse_bytes_with_stats(&self, bytes: &[u8]) -> (Vec<ParsedRecord>, ParseStats) {
        self.parse_str_with_stats(&String::from_utf8_lossy(bytes))
    }

    /// Parses transcript text.
    pub fn parse_str(&self, content: &str) -> Vec<ParsedRecord> {
        self.parse_str_with_stats(content).0
    }

    /// Parses transcript text and returns the counters as well.
    pub fn parse_str_with_stats(&self, content: &str) -> (Vec<ParsedRecord>, ParseStats) {
        let mut builder = self.builder();
        let mut records: Vec<ParsedRecord> =
            content.lines().filter_map(|line| builder.push_line(line)).collect();
        records.extend(builder.finish());
        (records, builder.stats())
    }

    /// Streams records from a transcript file without loading it whole.
    #[cfg(feature = "streaming")]
    pub fn stream(
        &self,
        path: &Path,
    ) -> Result<RecordIterator<std::io::BufReader<fs::File>>> {
        RecordIterator::open(path, self)
    }
}

impl Default for AuditParser {
    fn default() -> Self {
        Self::new()
    }
}
