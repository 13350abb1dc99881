//! File storage port for uploaded media.
//!
//! The domain depends on this trait; adapters (like LocalFileStorage)
//! provide the implementation. Stored files get generated names, so an
//! upload can never overwrite an existing file or smuggle a path.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use thiserror::Error;

/// Upload extensions accepted for images.
static IMAGE_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["jpeg", "png", "jpg", "gif", "webp"].into_iter().collect());

/// Upload extensions accepted for videos.
static VIDEO_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["mp4", "mov", "avi", "wmv", "flv", "mkv", "webm", "mpeg", "mpg"]
        .into_iter()
        .collect()
});

/// Port for persisting uploaded files.
///
/// Implementations must not leave a partial file behind on failure and
/// must enforce the per-area extension allow-list and the configured
/// size cap before writing anything.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist `bytes` under a generated name in the given area.
    ///
    /// `original_filename` contributes only its extension; the rest of
    /// the client-supplied name is discarded.
    async fn store(
        &self,
        area: StorageArea,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError>;
}

/// Directory bucket a file is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// General image uploads.
    Uploads,
    /// Coach training videos.
    Videos,
}

impl StorageArea {
    /// Returns the directory name for this area.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageArea::Uploads => "uploads",
            StorageArea::Videos => "videos",
        }
    }

    /// Whether the (lowercased) extension is accepted in this area.
    pub fn allows_extension(&self, extension: &str) -> bool {
        let ext = extension.to_ascii_lowercase();
        match self {
            StorageArea::Uploads => IMAGE_EXTENSIONS.contains(ext.as_str()),
            StorageArea::Videos => VIDEO_EXTENSIONS.contains(ext.as_str()),
        }
    }
}

/// Extracts the lowercased extension of a client-supplied filename.
///
/// Returns `None` when there is no extension at all.
pub fn extension_of(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

/// A successfully persisted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the storage root, e.g. `uploads/<name>.png`.
    pub path: String,
    /// Public URL the file is served under.
    pub url: String,
}

/// Errors that can occur during file storage operations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// IO error during the write.
    #[error("storage io error: {message}")]
    Io { message: String },

    /// Payload exceeds the configured cap for the area.
    #[error("file too large: {size_bytes} bytes (max: {max_bytes})")]
    TooLarge { size_bytes: u64, max_bytes: u64 },

    /// Extension outside the area's allow-list.
    #[error("unsupported file type: '{extension}'")]
    UnsupportedType { extension: String },
}

impl StorageError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        StorageError::Io {
            message: message.into(),
        }
    }

    /// Creates a too-large error.
    pub fn too_large(size_bytes: u64, max_bytes: u64) -> Self {
        StorageError::TooLarge {
            size_bytes,
            max_bytes,
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(extension: impl Into<String>) -> Self {
        StorageError::UnsupportedType {
            extension: extension.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::io(err.to_string())
    }
}
