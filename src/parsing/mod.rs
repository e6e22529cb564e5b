//! Line-level parsing utilities.
//!
//! This module contains the pieces shared by the in-memory and streaming
//! parsers:
//! - [`Segmenter`] - classifies transcript lines into [`LineKind`]s
//! - [`FieldNormalizer`] - folds label variants onto canonical keys

pub mod fields;
pub mod segment;

pub use fields::FieldNormalizer;
pub use segment::{LineKind, MessageHeader, Segmenter};
