//! Photo linking for parsed records.
//!
//! [`link_photos`] walks the records once and fills in
//! [`photo_link`](ParsedRecord::photo_link):
//!
//! | Situation | Link |
//! |-----------|------|
//! | no photo referenced | `-` |
//! | photo not in the bundle | `NOT FOUND` |
//! | photo stored | link returned by the store |
//! | store failed | empty |
//!
//! [`check_photos`] does the same lookup without a store, leaving resolved
//! photos with an empty link.
//!
//! Stored photos are renamed after the record, e.g.
//! `K7-RCM1-AR0006500-NO_SN-1-8-2024.jpg`.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::record::{LINK_NO_IMAGE, LINK_NOT_FOUND, ParsedRecord};
use crate::resolver::ImageResolver;
use crate::store::PhotoStore;

/// Outcome counts of [`link_photos`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    /// Photos stored successfully.
    pub uploaded: usize,
    /// Referenced photos missing from the bundle.
    pub not_found: usize,
    /// Records without a photo.
    pub no_image: usize,
    /// Photos that could not be read or stored.
    pub failed: usize,
    /// Photos resolved by [`check_photos`] but not stored.
    pub found: usize,
}

/// Resolves, stores and links the photo of every record.
///
/// Store failures do not abort the run; the link is left empty and a warning
/// is logged.
///
/// # Example
///
/// ```rust
/// use auditpack::bundle::ImageIndex;
/// use auditpack::config::ResolverConfig;
/// use auditpack::export::link_photos;
/// use auditpack::resolver::ImageResolver;
/// use auditpack::store::DirectoryStore;
/// use auditpack::ParsedRecord;
///
/// let out = tempfile::tempdir()?;
/// let store = DirectoryStore::new(out.path())?;
/// let index = ImageIndex::new();
/// let resolver = ImageResolver::new(&index, ResolverConfig::default());
///
/// let mut records = vec![
///     ParsedRecord::new("1/8/2024 09:15", "Alice").with_field("LOC", "K7"),
///     ParsedRecord::new("1/8/2024 09:16", "Alice")
///         .with_field("LOC", "K8")
///         .with_photo("IMG-20240801-WA0009.jpg"),
/// ];
///
/// let stats = link_photos(&mut records, &resolver, &store);
/// assert_eq!(records[0].photo_link, "-");
/// assert_eq!(records[1].photo_link, "NOT FOUND");
/// assert_eq!(stats.no_image, 1);
/// assert_eq!(stats.not_found, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn link_photos(
    records: &mut [ParsedRecord],
    resolver: &ImageResolver<'_>,
    store: &dyn PhotoStore,
) -> LinkStats {
    let mut stats = LinkStats::default();

    for record in records.iter_mut() {
        if !record.has_photo() {
            record.photo_link = LINK_NO_IMAGE.to_string();
            stats.no_image += 1;
            continue;
        }

        let Some(path) = resolver.resolve(&record.photo_file) else {
            tracing::warn!(photo = %record.photo_file, loc = %record.loc, "photo not found in export");
            record.photo_link = LINK_NOT_FOUND.to_string();
            stats.not_found += 1;
            continue;
        };

        let name = upload_name(record, path);
        let stored = fs::read(path)
            .map_err(crate::AuditpackError::from)
            .and_then(|bytes| store.store(&name, &bytes, content_type(path)));

        match stored {
            Ok(link) => {
                record.photo_link = link;
                stats.uploaded += 1;
            }
            Err(e) => {
                tracing::warn!(photo = %record.photo_file, error = %e, "photo upload failed");
                record.photo_link = String::new();
                stats.failed += 1;
            }
        }
    }

    tracing::info!(
        uploaded = stats.uploaded,
        not_found = stats.not_found,
        no_image = stats.no_image,
        failed = stats.failed,
        "linked photos"
    );
    stats
}

/// Resolves every record's photo without storing anything.
///
/// Missing photos and records without one get the same markers as in
/// [`link_photos`]; resolved photos keep an empty link.
pub fn check_photos(records: &mut [ParsedRecord], resolver: &ImageResolver<'_>) -> LinkStats {
    let mut stats = LinkStats::default();

    for record in records.iter_mut() {
        if !record.has_photo() {
            record.photo_link = LINK_NO_IMAGE.to_string();
            stats.no_image += 1;
        } else if resolver.resolve(&record.photo_file).is_some() {
            record.photo_link.clear();
            stats.found += 1;
        } else {
            tracing::warn!(photo = %record.photo_file, loc = %record.loc, "photo not found in export");
            record.photo_link = LINK_NOT_FOUND.to_string();
            stats.not_found += 1;
        }
    }

    tracing::info!(
        found = stats.found,
        not_found = stats.not_found,
        no_image = stats.no_image,
        "checked photos"
    );
    stats
}

/// Builds the stored file name for a record's photo.
///
/// Non-empty `LOC`, `BIN`, `PN`, `SN` (`NO_SN` when absent) and the header
/// date, `/` replaced by `-`, joined by `-`, plus the source extension.
pub fn upload_name(record: &ParsedRecord, source: &Path) -> String {
    let clean = |value: &str| value.replace('/', "-").trim().to_string();

    let sn = match clean(&record.sn) {
        sn if sn.is_empty() => "NO_SN".to_string(),
        sn => sn,
    };

    let parts = [
        clean(&record.loc),
        clean(&record.bin),
        clean(&record.pn),
        sn,
        clean(record.date()),
    ];

    let mut name = parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("-");

    if let Some(ext) = source.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }
    name
}

/// MIME type for a photo path: `image/png` or `image/jpeg`.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}
