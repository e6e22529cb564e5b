//! Parse statistics.

use std::fmt;

use serde::Serialize;

/// Counters collected while building records from a transcript.
///
/// # Example
///
/// ```rust
/// use auditpack::parser::AuditParser;
///
/// let parser = AuditParser::new();
/// let (records, stats) = parser.parse_str_with_stats(
///     "1/8/2024, 09:15 - Alice:\nLOC: K7\n1/8/2024, 09:16 - Bob: hi",
/// );
///
/// assert_eq!(records.len(), 1);
/// assert_eq!(stats.blocks, 2);
/// assert_eq!(stats.discarded, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines fed to the builder.
    pub lines: usize,
    /// Message headers seen.
    pub blocks: usize,
    /// Records emitted.
    pub records: usize,
    /// Blocks finalized without a `LOC` value.
    pub discarded: usize,
    /// Field, photo or media lines seen before the first header.
    pub stray: usize,
}

impl ParseStats {
    /// Share of blocks that produced a record, in percent.
    pub fn yield_ratio(&self) -> f64 {
        if self.blocks == 0 {
            return 0.0;
        }
        (self.records as f64 / self.blocks as f64) * 100.0
    }
}

impl fmt::Display for ParseStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} messages, {} records, {} discarded",
            self.lines, self.blocks, self.records, self.discarded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yield_ratio() {
        let stats = ParseStats {
            blocks: 4,
            records: 1,
            ..ParseStats::default()
        };
        assert!((stats.yield_ratio() - 25.0).abs() < f64::EPSILON);
        assert!(ParseStats::default().yield_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        let stats = ParseStats {
            lines: 10,
            blocks: 3,
            records: 2,
            discarded: 1,
            stray: 0,
        };
        assert_eq!(
            stats.to_string(),
            "10 lines, 3 messages, 2 records, 1 discarded"
        );
    }
}
