//! Photo stores.
//!
//! A [`PhotoStore`] takes the bytes of one photo and returns a link to the
//! stored copy. Two stores ship with the crate:
//!
//! - [`DirectoryStore`] - copies photos into a local directory
//! - [`HttpStore`] - `PUT`s photos to an HTTP endpoint (requires `http-store`)

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AuditpackError, Result};

/// Stores photo bytes and returns a shareable link.
pub trait PhotoStore {
    /// Stores `bytes` under `name` and returns the link to it.
    fn store(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<String>;
}

/// Copies photos into a directory.
///
/// Existing files are never overwritten: a second `K7-RCM1.jpg` is stored as
/// `K7-RCM1-2.jpg`, then `K7-RCM1-3.jpg` and so on.
///
/// # Example
///
/// ```rust
/// use auditpack::store::{DirectoryStore, PhotoStore};
///
/// let dir = tempfile::tempdir()?;
/// let store = DirectoryStore::new(dir.path())?.with_base_url("https://photos.example.com/audit/");
///
/// let link = store.store("K7-RCM1.jpg", b"...", "image/jpeg")?;
/// assert_eq!(link, "https://photos.example.com/audit/K7-RCM1.jpg");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    base_url: Option<String>,
}

impl DirectoryStore {
    /// Creates the store, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            base_url: None,
        })
    }

    /// Returns links under `base_url` instead of local paths.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Returns the target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn free_name(&self, name: &str) -> String {
        if !self.dir.join(name).exists() {
            return name.to_string();
        }

        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (name, None),
        };

        (2..)
            .map(|n| match ext {
                Some(ext) => format!("{stem}-{n}.{ext}"),
                None => format!("{stem}-{n}"),
            })
            .find(|candidate| !self.dir.join(candidate).exists())
            .unwrap_or_else(|| name.to_string())
    }
}

impl PhotoStore for DirectoryStore {
    fn store(&self, name: &str, bytes: &[u8], _content_type: &str) -> Result<String> {
        let name = sanitize(name);
        if name.is_empty() {
            return Err(AuditpackError::upload(name, "empty file name"));
        }

        let name = self.free_name(&name);
        let path = self.dir.join(&name);
        fs::write(&path, bytes).map_err(|e| AuditpackError::upload(&name, e.to_string()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "stored photo");

        Ok(match &self.base_url {
            Some(base) => format!("{base}/{name}"),
            None => fs::canonicalize(&path)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned(),
        })
    }
}

/// Uploads photos with HTTP `PUT` to `base_url/name`.
///
/// The returned link is the upload URL. No retries are attempted; a failed
/// upload is reported as [`AuditpackError::Upload`].
#[cfg(feature = "http-store")]
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[cfg(feature = "http-store")]
impl HttpStore {
    /// Creates a store uploading under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditpackError::InvalidConfig`] if `base_url` is not an
    /// `http(s)` URL or the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AuditpackError::invalid_config(
                "upload_url",
                format!("'{base_url}' is not an http(s) URL"),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| AuditpackError::invalid_config("upload_url", e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Returns the upload base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(feature = "http-store")]
impl PhotoStore for HttpStore {
    fn store(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, sanitize(name));

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .map_err(|e| AuditpackError::upload(name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditpackError::upload(name, format!("server returned {status}")));
        }

        tracing::debug!(%url, bytes = bytes.len(), "uploaded photo");
        Ok(url)
    }
}

/// Replaces characters that are unsafe in file names and URL paths.
fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '#' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}
