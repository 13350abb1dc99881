//! Local Filesystem Storage Adapter - Implementation of FileStorage.
//!
//! Stores uploaded media under per-area directories with generated
//! names. Uses atomic writes so a crashed upload never leaves a
//! partial file at a served path.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::ports::{extension_of, FileStorage, StorageArea, StorageError, StoredFile};

/// Local filesystem storage for uploaded images and videos.
///
/// # Directory Structure
///
/// ```text
/// {root}/
/// ├── uploads/
/// │   └── 3fa85f64-5717-4562-b3fc-2c963f66afa6.png
/// └── videos/
///     └── 9b2d1c44-0f5a-4c8e-a3da-52d7c1b2ee01.mp4
/// ```
///
/// # Atomic Writes
///
/// Uses a write-to-temp-then-rename pattern:
/// 1. Write bytes to `{name}.tmp`
/// 2. Sync to disk
/// 3. Rename to `{name}`
///
/// Extension and size checks run before anything touches the disk, and
/// a failed write removes its temp file.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    /// Root directory for all stored files.
    root: PathBuf,
    /// Base URL prepended to generated URLs; empty means relative URLs.
    public_base_url: String,
    max_image_bytes: u64,
    max_video_bytes: u64,
}

impl LocalFileStorage {
    /// Creates a new local file storage from the storage configuration.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            max_image_bytes: config.max_image_bytes,
            max_video_bytes: config.max_video_bytes,
        }
    }

    /// Returns the directory for a storage area.
    fn area_dir(&self, area: StorageArea) -> PathBuf {
        self.root.join(area.as_str())
    }

    /// Returns the size cap for a storage area.
    fn max_bytes_for(&self, area: StorageArea) -> u64 {
        match area {
            StorageArea::Uploads => self.max_image_bytes,
            StorageArea::Videos => self.max_video_bytes,
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(
        &self,
        area: StorageArea,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let extension = match extension_of(original_filename) {
            Some(ext) if area.allows_extension(&ext) => ext,
            Some(ext) => return Err(StorageError::unsupported_type(ext)),
            None => return Err(StorageError::unsupported_type("")),
        };

        let size = bytes.len() as u64;
        let max_bytes = self.max_bytes_for(area);
        if size > max_bytes {
            return Err(StorageError::too_large(size, max_bytes));
        }

        let dir = self.area_dir(area);
        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create storage directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        // The generated name discards everything client-supplied except
        // the (validated) extension
        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let temp_path = dir.join(format!("{}.tmp", name));
        let final_path = dir.join(&name);

        if let Err(e) = write_then_rename(&temp_path, &final_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        let path = format!("{}/{}", area.as_str(), name);
        let url = format!("{}/storage/{}", self.public_base_url, path);

        Ok(StoredFile { path, url })
    }
}

/// Write bytes to the temp path, sync, and rename into place.
async fn write_then_rename(
    temp_path: &Path,
    final_path: &Path,
    bytes: &[u8],
) -> Result<(), StorageError> {
    let mut file = fs::File::create(temp_path).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to create temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.write_all(bytes).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to write to temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::io(format!(
            "Failed to sync temp file {}: {}",
            temp_path.display(),
            e
        ))
    })?;

    fs::rename(temp_path, final_path).await.map_err(|e| {
        StorageError::io(format!(
            "Failed to rename {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e
        ))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ───────────────────────────────────────────────────────────────
    // Test helpers
    // ───────────────────────────────────────────────────────────────

    fn create_storage() -> (LocalFileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig {
            root: temp_dir.path().to_path_buf(),
            public_base_url: String::new(),
            max_image_bytes: 1024,
            max_video_bytes: 2048,
        };
        (LocalFileStorage::new(&config), temp_dir)
    }

    // ───────────────────────────────────────────────────────────────
    // Store tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn store_writes_the_file_under_its_area() {
        let (storage, temp) = create_storage();

        let stored = storage
            .store(StorageArea::Uploads, "logo.png", b"fake png bytes")
            .await
            .unwrap();

        assert!(stored.path.starts_with("uploads/"));
        assert!(stored.path.ends_with(".png"));
        let on_disk = temp.path().join(&stored.path);
        assert!(on_disk.exists());
        assert_eq!(std::fs::read(on_disk).unwrap(), b"fake png bytes");
    }

    #[tokio::test]
    async fn stored_name_is_generated_not_client_supplied() {
        let (storage, _temp) = create_storage();

        let stored = storage
            .store(StorageArea::Uploads, "logo.png", b"x")
            .await
            .unwrap();

        assert!(!stored.path.contains("logo"));
    }

    #[tokio::test]
    async fn repeated_filenames_do_not_collide() {
        let (storage, _temp) = create_storage();

        let first = storage
            .store(StorageArea::Uploads, "logo.png", b"one")
            .await
            .unwrap();
        let second = storage
            .store(StorageArea::Uploads, "logo.png", b"two")
            .await
            .unwrap();

        assert_ne!(first.path, second.path);
    }

    #[tokio::test]
    async fn extension_is_lowercased() {
        let (storage, _temp) = create_storage();

        let stored = storage
            .store(StorageArea::Uploads, "PHOTO.PNG", b"x")
            .await
            .unwrap();

        assert!(stored.path.ends_with(".png"));
    }

    #[tokio::test]
    async fn no_temp_file_remains_after_store() {
        let (storage, temp) = create_storage();

        storage
            .store(StorageArea::Uploads, "logo.png", b"x")
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp.path().join("uploads"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].ends_with(".tmp"));
    }

    // ───────────────────────────────────────────────────────────────
    // URL tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn url_is_relative_without_a_base() {
        let (storage, _temp) = create_storage();

        let stored = storage
            .store(StorageArea::Uploads, "logo.png", b"x")
            .await
            .unwrap();

        assert_eq!(stored.url, format!("/storage/{}", stored.path));
    }

    #[tokio::test]
    async fn url_uses_the_configured_base() {
        let temp = TempDir::new().unwrap();
        let config = StorageConfig {
            root: temp.path().to_path_buf(),
            public_base_url: "https://cdn.example.com/".to_string(),
            max_image_bytes: 1024,
            max_video_bytes: 2048,
        };
        let storage = LocalFileStorage::new(&config);

        let stored = storage
            .store(StorageArea::Uploads, "logo.png", b"x")
            .await
            .unwrap();

        assert_eq!(
            stored.url,
            format!("https://cdn.example.com/storage/{}", stored.path)
        );
    }

    // ───────────────────────────────────────────────────────────────
    // Rejection tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn rejects_disallowed_extension() {
        let (storage, temp) = create_storage();

        let result = storage
            .store(StorageArea::Uploads, "script.php", b"<?php")
            .await;

        assert!(matches!(result, Err(StorageError::UnsupportedType { .. })));
        assert!(!temp.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn rejects_missing_extension() {
        let (storage, _temp) = create_storage();

        let result = storage.store(StorageArea::Uploads, "noext", b"x").await;

        assert!(matches!(result, Err(StorageError::UnsupportedType { .. })));
    }

    #[tokio::test]
    async fn rejects_video_extension_in_uploads_area() {
        let (storage, _temp) = create_storage();

        let result = storage.store(StorageArea::Uploads, "clip.mp4", b"x").await;

        assert!(matches!(result, Err(StorageError::UnsupportedType { .. })));
    }

    #[tokio::test]
    async fn rejects_oversized_payload_without_writing() {
        let (storage, temp) = create_storage();
        let oversized = vec![0u8; 1025];

        let result = storage
            .store(StorageArea::Uploads, "logo.png", &oversized)
            .await;

        assert!(matches!(result, Err(StorageError::TooLarge { .. })));
        assert!(!temp.path().join("uploads").exists());
    }

    #[tokio::test]
    async fn video_area_uses_the_video_cap() {
        let (storage, _temp) = create_storage();
        // Over the image cap, under the video cap
        let payload = vec![0u8; 1500];

        let stored = storage
            .store(StorageArea::Videos, "session.mp4", &payload)
            .await
            .unwrap();

        assert!(stored.path.starts_with("videos/"));
    }
}
