//! Streaming record extraction for large transcripts.
//!
//! [`RecordIterator`] reads a transcript line by line and yields each record
//! as soon as the next message header closes its block, so memory use stays
//! flat regardless of file size.
//!
//! # Example
//!
//! ```rust,no_run
//! use auditpack::parser::AuditParser;
//!
//! let parser = AuditParser::new();
//! let mut records = parser.stream("chat.txt".as_ref())?;
//!
//! while let Some(record) = records.next() {
//!     let record = record?;
//!     println!("{} {}", record.loc, record.pn);
//!
//!     if let Some(pct) = records.progress() {
//!         eprint!("\r{pct:.1}%");
//!     }
//! }
//! # Ok::<(), auditpack::AuditpackError>(())
//! ```

mod records;

pub use records::RecordIterator;
