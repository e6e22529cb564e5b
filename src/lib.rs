//! # Auditpack
//!
//! A Rust library for turning WhatsApp chat exports from a stock-audit team
//! into a spreadsheet of audit records, with each record linked to its photo.
//!
//! ## Overview
//!
//! Auditors post one message per counted bin:
//!
//! ```text
//! 1/8/2024, 09:15 - Alice:
//! LOC: K7
//! BIN: RCM1
//! PN: AR0006500
//! QTY EMRO: 46
//! QTY ACTUAL: 47
//! REMARK: SURPLUS 1
//! IMG-20240801-WA0001.jpg (file attached)
//! ```
//!
//! The parser folds the transcript line by line into [`ParsedRecord`]s. A
//! message becomes a record only if it carries a `LOC` field. Field labels
//! are normalized (`QTY ACT` and `QTY ACTUAL` are the same column), later
//! values overwrite earlier ones within a message, and a `<Media omitted>`
//! line clears the referenced photo.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use auditpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let bundle = ExportBundle::open("WhatsApp Chat.zip".as_ref())?;
//!     let mut records = AuditParser::new().parse(bundle.chat_path())?;
//!
//!     // Copy photos next to the spreadsheet and link them
//!     let store = DirectoryStore::new("photos")?;
//!     let resolver = ImageResolver::new(bundle.images(), ResolverConfig::default());
//!     link_photos(&mut records, &resolver, &store);
//!
//!     write_csv(&records, "audit.csv", &OutputConfig::new())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming for Large Files
//!
//! ```rust,no_run
//! use auditpack::parser::AuditParser;
//!
//! let parser = AuditParser::new();
//! for result in parser.stream("huge_chat.txt".as_ref())? {
//!     let record = result?;
//!     println!("{} {}", record.loc, record.qty_actual);
//! }
//! # Ok::<(), auditpack::AuditpackError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`AuditParser`](parser::AuditParser) and the record builder state machine
//! - [`parsing`] - Line classification and field label normalization
//! - [`record`] - [`ParsedRecord`] and canonical field keys
//! - [`config`] - [`ParserConfig`](config::ParserConfig), [`ResolverConfig`](config::ResolverConfig)
//! - [`bundle`] - Opening zip, directory or bare transcript exports
//! - [`resolver`] - Matching referenced photo names to bundle files
//! - [`store`] - Where photos are copied or uploaded
//! - [`export`] - Photo linking for the output rows
//! - [`core`] - Filtering, parse statistics and output writers
//! - [`format`] - Output format selection
//! - [`streaming`] - Record iterator over a reader
//! - [`error`] - Unified error types ([`AuditpackError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

pub mod bundle;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod format;
pub mod parser;
pub mod parsing;
pub mod record;
pub mod resolver;
pub mod store;

#[cfg(feature = "streaming")]
pub mod streaming;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod logging;

// Re-export the main types at the crate root for convenience
pub use error::{AuditpackError, Result};
pub use record::ParsedRecord;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use auditpack::prelude::*;
/// ```
pub mod prelude {
    // Record type
    pub use crate::ParsedRecord;

    // Error types
    pub use crate::error::{AuditpackError, Result};

    // Parsing
    pub use crate::config::{DateOrder, ParserConfig, ResolverConfig};
    pub use crate::parser::AuditParser;

    // Bundle, photos and linking
    pub use crate::bundle::{ExportBundle, ImageIndex};
    pub use crate::export::{LinkStats, check_photos, link_photos};
    pub use crate::resolver::ImageResolver;
    pub use crate::store::{DirectoryStore, PhotoStore};

    #[cfg(feature = "http-store")]
    pub use crate::store::HttpStore;

    // Filtering, stats and output configuration
    pub use crate::core::filter::{FilterConfig, apply_filters};
    pub use crate::core::models::OutputConfig;
    pub use crate::core::processor::ParseStats;

    // Output (file writers and string converters)
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    #[cfg(feature = "streaming")]
    pub use crate::streaming::RecordIterator;
}
