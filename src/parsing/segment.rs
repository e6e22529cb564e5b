//! Line classification for WhatsApp TXT exports.
//!
//! Every transcript line is classified as exactly one [`LineKind`]. The
//! header check runs first; the remaining checks form an ordered rule list
//! evaluated first-match-wins:
//!
//! 1. photo reference (`IMG-20240801-WA0001.jpg`)
//! 2. media-omitted marker (`<Media omitted>`)
//! 3. malformed header (`1/8/2024, 09:15 - Alice` without the colon)
//! 4. field (`Label: Value`, split on the first colon)
//!
//! Anything else is [`LineKind::Other`].
//!
//! Supported header format (Android, 24-hour):
//! - `1/8/2024, 09:15 - Alice: ...`
//! - `01.08.24, 9:15 - Alice: ...`

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config::{DateOrder, ParserConfig};
use crate::error::{AuditpackError, Result};

// 1/8/2024, 09:15 - Sender:
const HEADER_PATTERN: &str =
    r"^(\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}),\s(\d{1,2}:\d{2})\s-\s([^:]+):";

// Same prefix without a complete `Sender:` part.
const MALFORMED_HEADER_PATTERN: &str = r"^\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4},\s\d{1,2}:\d{2}\b";

/// Header of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader<'a> {
    /// Date as written, e.g. `1/8/2024`.
    pub date: &'a str,
    /// Time as written, e.g. `09:15`.
    pub time: &'a str,
    /// Sender, trimmed.
    pub sender: &'a str,
}

impl MessageHeader<'_> {
    /// Returns `"<date> <time>"`.
    pub fn timestamp(&self) -> String {
        format!("{} {}", self.date, self.time)
    }

    /// Parses the header date and time, or `None` if it is not a valid date.
    pub fn datetime(&self, order: DateOrder) -> Option<NaiveDateTime> {
        let date = self.date.replace(['.', '-'], "/");
        let year_digits = date.rsplit('/').next().map_or(0, str::len);
        let datetime = format!("{date} {}", self.time);

        NaiveDateTime::parse_from_str(&datetime, order.parse_format(year_digits)).ok()
    }
}

/// Classification of a single transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A new chat message begins.
    MessageStart {
        header: MessageHeader<'a>,
        /// Photo name found anywhere on the header line.
        image: Option<&'a str>,
        /// Text after `Sender:`, trimmed.
        rest: &'a str,
    },
    /// The line references a photo file.
    ImageReference(&'a str),
    /// An attachment existed but was not exported.
    MediaOmitted,
    /// `Label: Value`, label upper-cased and trimmed, value trimmed.
    Field { label: String, value: &'a str },
    /// Blank, chatter or malformed.
    Other,
}

type Rule = for<'a> fn(&Segmenter, &'a str) -> Option<LineKind<'a>>;

/// Rules for non-header lines, in precedence order.
const CONTINUATION_RULES: [(&str, Rule); 4] = [
    ("image", Segmenter::match_image),
    ("media-omitted", Segmenter::match_media_omitted),
    ("malformed-header", Segmenter::match_malformed_header),
    ("field", Segmenter::match_field),
];

/// Classifies transcript lines.
///
/// # Example
///
/// ```rust
/// use auditpack::config::ParserConfig;
/// use auditpack::parsing::{LineKind, Segmenter};
///
/// let segmenter = Segmenter::new(&ParserConfig::default())?;
///
/// assert!(matches!(
///     segmenter.classify("1/8/2024, 09:15 - Alice:"),
///     LineKind::MessageStart { .. }
/// ));
/// assert_eq!(
///     segmenter.classify("IMG-20240801-WA0001.jpg (file attached)"),
///     LineKind::ImageReference("IMG-20240801-WA0001.jpg")
/// );
/// assert_eq!(segmenter.classify("<Media omitted>"), LineKind::MediaOmitted);
/// assert_eq!(
///     segmenter.classify("Qty Act: 12"),
///     LineKind::Field { label: "QTY ACT".into(), value: "12" }
/// );
/// assert_eq!(segmenter.classify("Hello, good morning"), LineKind::Other);
/// # Ok::<(), auditpack::AuditpackError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    header: Regex,
    malformed_header: Regex,
    image: Regex,
    media_omitted_markers: Vec<String>,
}

impl Segmenter {
    /// Compiles the header and photo patterns.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::Pattern`] if `config.image_pattern` is not a
    /// valid regular expression.
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            header: compile(HEADER_PATTERN)?,
            malformed_header: compile(MALFORMED_HEADER_PATTERN)?,
            image: compile(&config.image_pattern)?,
            media_omitted_markers: config
                .media_omitted_markers
                .iter()
                .map(|marker| marker.trim().to_lowercase())
                .filter(|marker| !marker.is_empty())
                .collect(),
        })
    }

    /// Classifies one line of the transcript.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let line = line.trim();
        if line.is_empty() {
            return LineKind::Other;
        }

        if let Some(start) = self.match_header(line) {
            return start;
        }

        self.classify_continuation(line)
    }

    /// Classifies a line that is known not to start a message.
    ///
    /// Used for the text following `Sender:` on a header line.
    pub fn classify_continuation<'a>(&self, line: &'a str) -> LineKind<'a> {
        let line = line.trim();
        if line.is_empty() {
            return LineKind::Other;
        }

        CONTINUATION_RULES
            .iter()
            .find_map(|(name, rule)| {
                let kind = rule(self, line)?;
                tracing::trace!(rule = *name, "line classified");
                Some(kind)
            })
            .unwrap_or(LineKind::Other)
    }

    fn match_header<'a>(&self, line: &'a str) -> Option<LineKind<'a>> {
        let caps = self.header.captures(line)?;
        let whole = caps.get(0)?;

        let header = MessageHeader {
            date: caps.get(1).map_or("", |m| m.as_str()),
            time: caps.get(2).map_or("", |m| m.as_str()),
            sender: caps.get(3).map_or("", |m| m.as_str().trim()),
        };

        Some(LineKind::MessageStart {
            header,
            image: self.find_image(line),
            rest: line[whole.end()..].trim(),
        })
    }

    fn match_image<'a>(&self, line: &'a str) -> Option<LineKind<'a>> {
        self.find_image(line).map(LineKind::ImageReference)
    }

    fn match_media_omitted<'a>(&self, line: &'a str) -> Option<LineKind<'a>> {
        let lower = line.to_lowercase();
        self.media_omitted_markers
            .iter()
            .any(|marker| lower.contains(marker.as_str()))
            .then_some(LineKind::MediaOmitted)
    }

    fn match_malformed_header<'a>(&self, line: &'a str) -> Option<LineKind<'a>> {
        self.malformed_header
            .is_match(line)
            .then_some(LineKind::Other)
    }

    fn match_field<'a>(&self, line: &'a str) -> Option<LineKind<'a>> {
        let (label, value) = line.split_once(':')?;
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        Some(LineKind::Field {
            label: label.to_uppercase(),
            value: value.trim(),
        })
    }

    fn find_image<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.image.find(line).map(|m| m.as_str().trim())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| AuditpackError::pattern(pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn test_header_fields() {
        let kind = segmenter().classify("1/8/2024, 09:15 - Alice Smith: LOC: K7");
        let LineKind::MessageStart {
            header,
            image,
            rest,
        } = kind
        else {
            panic!("expected header");
        };

        assert_eq!(header.date, "1/8/2024");
        assert_eq!(header.time, "09:15");
        assert_eq!(header.sender, "Alice Smith");
        assert_eq!(header.timestamp(), "1/8/2024 09:15");
        assert_eq!(image, None);
        assert_eq!(rest, "LOC: K7");
    }

    #[test]
    fn test_header_widths() {
        let s = segmenter();
        for line in [
            "1/8/24, 9:15 - Bob:",
            "01/08/2024, 23:59 - Bob:",
            "1.8.2024, 09:15 - Bob: hi",
            "12-31-2024, 09:15 - Bob:",
        ] {
            assert!(
                matches!(s.classify(line), LineKind::MessageStart { .. }),
                "{line}"
            );
        }
    }

    #[test]
    fn test_header_with_image() {
        let kind = segmenter()
            .classify("1/8/2024, 09:15 - Alice: IMG-20240801-WA0001.jpg (file attached)");
        assert!(matches!(
            kind,
            LineKind::MessageStart {
                image: Some("IMG-20240801-WA0001.jpg"),
                ..
            }
        ));
    }

    #[test]
    fn test_header_datetime() {
        let kind = segmenter().classify("1/8/2024, 09:15 - Alice:");
        let LineKind::MessageStart { header, .. } = kind else {
            panic!("expected header");
        };

        let day_first = header.datetime(DateOrder::DayFirst).unwrap();
        assert_eq!(day_first.format("%Y-%m-%d %H:%M").to_string(), "2024-08-01 09:15");

        let month_first = header.datetime(DateOrder::MonthFirst).unwrap();
        assert_eq!(month_first.format("%Y-%m-%d").to_string(), "2024-01-08");
    }

    #[test]
    fn test_header_two_digit_year() {
        for date in ["1/8/24", "01.08.24", "01-08-24"] {
            let header = MessageHeader {
                date,
                time: "09:15",
                sender: "Alice",
            };
            let day_first = header.datetime(DateOrder::DayFirst).unwrap();
            assert_eq!(day_first.format("%Y-%m-%d").to_string(), "2024-08-01", "{date}");
            let month_first = header.datetime(DateOrder::MonthFirst).unwrap();
            assert_eq!(month_first.format("%Y-%m-%d").to_string(), "2024-01-08", "{date}");
        }
    }

    #[test]
    fn test_header_invalid_date_has_no_datetime() {
        let header = MessageHeader {
            date: "31/2/2024",
            time: "09:15",
            sender: "Alice",
        };
        assert_eq!(header.datetime(DateOrder::DayFirst), None);
    }

    #[test]
    fn test_image_patterns() {
        let s = segmenter();
        assert_eq!(
            s.classify("img-20240801-wa0001.JPEG"),
            LineKind::ImageReference("img-20240801-wa0001.JPEG")
        );
        assert_eq!(
            s.classify("IMG-20240801-WA0001 (1).png"),
            LineKind::ImageReference("IMG-20240801-WA0001 (1).png")
        );
        assert_eq!(s.classify("IMG-2024-WA0001.jpg"), LineKind::Other);
    }

    #[test]
    fn test_image_beats_field() {
        assert_eq!(
            segmenter().classify("Foto: IMG-20240801-WA0002.jpg"),
            LineKind::ImageReference("IMG-20240801-WA0002.jpg")
        );
    }

    #[test]
    fn test_media_omitted_variants() {
        let s = segmenter();
        assert_eq!(s.classify("<Media omitted>"), LineKind::MediaOmitted);
        assert_eq!(s.classify("<MEDIA OMITTED>"), LineKind::MediaOmitted);
        assert_eq!(s.classify("<Media tidak disertakan>"), LineKind::MediaOmitted);
    }

    #[test]
    fn test_media_omitted_beats_field() {
        assert_eq!(
            segmenter().classify("Photo: <Media omitted>"),
            LineKind::MediaOmitted
        );
    }

    #[test]
    fn test_field_splits_on_first_colon() {
        assert_eq!(
            segmenter().classify("Remark: counted at 10:30"),
            LineKind::Field {
                label: "REMARK".into(),
                value: "counted at 10:30"
            }
        );
    }

    #[test]
    fn test_field_with_empty_label_is_other() {
        assert_eq!(segmenter().classify(": K7"), LineKind::Other);
    }

    #[test]
    fn test_malformed_header_is_other() {
        let s = segmenter();
        assert_eq!(s.classify("1/8/2024, 09:15 - Alice"), LineKind::Other);
        assert_eq!(s.classify("1/8/2024, 09:15 - Bob added Carol"), LineKind::Other);
    }

    #[test]
    fn test_blank_and_chatter() {
        let s = segmenter();
        assert_eq!(s.classify(""), LineKind::Other);
        assert_eq!(s.classify("   "), LineKind::Other);
        assert_eq!(s.classify("Hello, good morning"), LineKind::Other);
    }

    #[test]
    fn test_custom_marker_and_invalid_pattern() {
        let config = ParserConfig::new().with_media_omitted_marker("<berkas dihapus>");
        let s = Segmenter::new(&config).unwrap();
        assert_eq!(s.classify("<Berkas dihapus>"), LineKind::MediaOmitted);

        let bad = ParserConfig::new().with_image_pattern("IMG-(");
        assert!(matches!(
            Segmenter::new(&bad),
            Err(AuditpackError::Pattern { .. })
        ));
    }
}
