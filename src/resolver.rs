//! Matching referenced photo names against the bundle.
//!
//! The name in the transcript does not always match the file on disk: phones
//! append ` (1)`, exporters change case, users retype names by hand. The
//! resolver tries an exact case-insensitive lookup first and falls back to the
//! closest indexed name by Jaro-Winkler similarity.

use std::path::Path;

use rapidfuzz::distance::jaro_winkler;

use crate::bundle::ImageIndex;
use crate::config::ResolverConfig;

/// How a referenced name was resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMatch<'a> {
    /// Lowercase indexed name that matched.
    pub name: &'a str,
    /// Path of the photo on disk.
    pub path: &'a Path,
    /// Similarity, `1.0` for an exact match.
    pub score: f64,
}

impl ImageMatch<'_> {
    /// Returns `true` if the name matched exactly (ignoring case).
    pub fn is_exact(&self) -> bool {
        self.score >= 1.0
    }
}

/// Resolves referenced photo names to files.
///
/// # Example
///
/// ```rust
/// use auditpack::bundle::ImageIndex;
/// use auditpack::config::ResolverConfig;
/// use auditpack::resolver::ImageResolver;
///
/// let mut index = ImageIndex::new();
/// index.insert("/export/IMG-20240801-WA0001.jpg");
///
/// let resolver = ImageResolver::new(&index, ResolverConfig::default());
/// assert!(resolver.resolve("img-20240801-wa0001.JPG").is_some());
/// assert!(resolver.resolve("IMG-20240801-WA0001 (1).jpg").is_some());
/// assert!(resolver.resolve("").is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImageResolver<'a> {
    index: &'a ImageIndex,
    config: ResolverConfig,
}

impl<'a> ImageResolver<'a> {
    /// Creates a resolver over `index`.
    pub fn new(index: &'a ImageIndex, config: ResolverConfig) -> Self {
        Self { index, config }
    }

    /// Returns the path for `name`, or `None` if nothing is close enough.
    pub fn resolve(&self, name: &str) -> Option<&'a Path> {
        self.resolve_match(name).map(|m| m.path)
    }

    /// Returns the best match for `name` with its score.
    ///
    /// Ties keep the first indexed name in sort order, so results are stable
    /// for a fixed index and threshold.
    pub fn resolve_match(&self, name: &str) -> Option<ImageMatch<'a>> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some((indexed, path)) = self.index.get_entry(name) {
            return Some(ImageMatch {
                name: indexed,
                path,
                score: 1.0,
            });
        }

        let key = name.to_lowercase();
        let mut best: Option<ImageMatch<'a>> = None;
        for (candidate, path) in self.index.iter() {
            let score = jaro_winkler::similarity(key.chars(), candidate.chars());
            if score < self.config.threshold {
                continue;
            }
            if best.is_none_or(|b| score > b.score) {
                best = Some(ImageMatch {
                    name: candidate,
                    path,
                    score,
                });
            }
        }

        match &best {
            Some(m) => {
                tracing::debug!(reference = name, matched = m.name, score = m.score, "fuzzy photo match");
            }
            None => tracing::debug!(reference = name, "no photo match"),
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> ImageIndex {
        let mut index = ImageIndex::new();
        for name in names {
            index.insert(format!("/export/{name}"));
        }
        index
    }

    #[test]
    fn test_exact_case_insensitive() {
        let index = index(&["IMG-20240801-WA0001.jpg", "IMG-20240801-WA0002.jpg"]);
        let resolver = ImageResolver::new(&index, ResolverConfig::default());

        let m = resolver.resolve_match("img-20240801-wa0002.JPG").unwrap();
        assert!(m.is_exact());
        assert_eq!(m.name, "img-20240801-wa0002.jpg");
        assert_eq!(m.path, Path::new("/export/IMG-20240801-WA0002.jpg"));
    }

    #[test]
    fn test_fuzzy_suffix() {
        let index = index(&["IMG-20240801-WA0001.jpg", "photo.png"]);
        let resolver = ImageResolver::new(&index, ResolverConfig::default());

        let m = resolver.resolve_match("IMG-20240801-WA0001 (1).jpg").unwrap();
        assert!(!m.is_exact());
        assert_eq!(m.name, "img-20240801-wa0001.jpg");
    }

    #[test]
    fn test_empty_reference_and_empty_index() {
        let empty = ImageIndex::new();
        let resolver = ImageResolver::new(&empty, ResolverConfig::default());
        assert!(resolver.resolve("IMG-20240801-WA0001.jpg").is_none());

        let index = index(&["IMG-20240801-WA0001.jpg"]);
        let resolver = ImageResolver::new(&index, ResolverConfig::default());
        assert!(resolver.resolve("   ").is_none());
    }

    #[test]
    fn test_threshold_excludes_weak_matches() {
        let index = index(&["IMG-20240801-WA0001.jpg"]);
        let strict = ResolverConfig::new().with_threshold(1.0).unwrap();
        let resolver = ImageResolver::new(&index, strict);
        assert!(resolver.resolve("IMG-20240801-WA0001 (1).jpg").is_none());
    }

    #[test]
    fn test_deterministic() {
        let index = index(&[
            "IMG-20240801-WA0001.jpg",
            "IMG-20240801-WA0002.jpg",
            "IMG-20240801-WA0003.jpg",
        ]);
        let resolver = ImageResolver::new(&index, ResolverConfig::default());
        let first = resolver.resolve("IMG-20240801-WA0004.jpg");
        for _ in 0..5 {
            assert_eq!(resolver.resolve("IMG-20240801-WA0004.jpg"), first);
        }
    }
}
