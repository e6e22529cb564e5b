//! Opening chat export bundles.
//!
//! A bundle is what WhatsApp's "Export chat" produces: a transcript `.txt`
//! plus the attached photos. [`ExportBundle::open`] accepts the export in
//! three shapes:
//!
//! - a `.zip` archive, extracted to a temporary directory owned by the bundle
//! - a directory the archive was already extracted to
//! - a bare `.txt` transcript, with photos taken from its directory
//!
//! # Example
//!
//! ```rust,no_run
//! use auditpack::bundle::ExportBundle;
//!
//! let bundle = ExportBundle::open("WhatsApp Chat with Audit.zip".as_ref())?;
//! println!("{} ({} photos)", bundle.chat_path().display(), bundle.images().len());
//! # Ok::<(), auditpack::AuditpackError>(())
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::{AuditpackError, Result};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Lowercase photo file name to its path on disk.
///
/// # Example
///
/// ```rust
/// use auditpack::bundle::ImageIndex;
///
/// let mut index = ImageIndex::new();
/// index.insert("/tmp/a/IMG-20240801-WA0001.jpg");
/// index.insert("/tmp/b/img-20240801-wa0001.jpg");
///
/// assert_eq!(index.len(), 1);
/// assert!(index.get("img-20240801-wa0001.JPG").unwrap().starts_with("/tmp/a"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl ImageIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every photo below `root`, in file-name order.
    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut index = Self::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_image(entry.path()) {
                index.insert(entry.path());
            }
        }
        Ok(index)
    }

    /// Adds a photo. Returns `false` if its name was already indexed.
    ///
    /// The first path seen for a name is kept.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let key = name.to_lowercase();
        if self.entries.contains_key(&key) {
            tracing::debug!(path = %path.display(), "duplicate photo name ignored");
            return false;
        }
        self.entries.insert(key, path);
        true
    }

    /// Looks up a photo by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(&name.to_lowercase()).map(PathBuf::as_path)
    }

    /// Looks up a photo by name, returning the indexed key as well.
    pub fn get_entry(&self, name: &str) -> Option<(&str, &Path)> {
        self.entries
            .get_key_value(&name.to_lowercase())
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Iterates over `(lowercase name, path)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Returns the number of indexed photos.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no photos are indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An opened chat export.
#[derive(Debug)]
pub struct ExportBundle {
    root: PathBuf,
    chat_path: PathBuf,
    images: ImageIndex,
    // Keeps the extracted archive alive as long as the bundle.
    _extracted: Option<TempDir>,
}

impl ExportBundle {
    /// Opens a `.zip` archive, an extracted directory or a bare `.txt` file.
    ///
    /// # Errors
    ///
    /// - [`AuditpackError::Zip`] if the archive is corrupt
    /// - [`AuditpackError::ChatNotFound`] if no `.txt` transcript exists
    /// - [`AuditpackError::UnsupportedInput`] for any other file type
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Self::from_dir(path.to_path_buf(), None);
        }

        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
            .into());
        }

        match extension(path).as_deref() {
            Some("zip") => Self::from_zip(path),
            Some("txt") => {
                let root = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                let images = ImageIndex::from_dir(&root)?;
                tracing::info!(photos = images.len(), "opened transcript");
                Ok(Self {
                    root,
                    chat_path: path.to_path_buf(),
                    images,
                    _extracted: None,
                })
            }
            _ => Err(AuditpackError::unsupported_input(path)),
        }
    }

    fn from_zip(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let mut archive = zip::ZipArchive::new(file)?;
        let temp_dir = tempfile::tempdir()?;

        tracing::debug!(
            archive = %path.display(),
            entries = archive.len(),
            dest = %temp_dir.path().display(),
            "extracting export"
        );
        archive.extract(temp_dir.path())?;

        let root = temp_dir.path().to_path_buf();
        Self::from_dir(root, Some(temp_dir))
    }

    fn from_dir(root: PathBuf, extracted: Option<TempDir>) -> Result<Self> {
        let chat_path = find_chat(&root)?;
        let images = ImageIndex::from_dir(&root)?;

        tracing::info!(
            chat = %chat_path.display(),
            photos = images.len(),
            "opened export bundle"
        );

        Ok(Self {
            root,
            chat_path,
            images,
            _extracted: extracted,
        })
    }

    /// Returns the directory photos were indexed from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the transcript path.
    pub fn chat_path(&self) -> &Path {
        &self.chat_path
    }

    /// Returns the photo index.
    pub fn images(&self) -> &ImageIndex {
        &self.images
    }
}

/// First `.txt` file in a file-name-sorted walk.
fn find_chat(root: &Path) -> Result<PathBuf> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && extension(entry.path()).as_deref() == Some("txt")
            && !is_hidden(entry.path())
        {
            return Ok(entry.into_path());
        }
    }
    Err(AuditpackError::chat_not_found(root))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str())) && !is_hidden(path)
}

// macOS resource forks (`._chat.txt`) sneak into re-zipped exports.
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
