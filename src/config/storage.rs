//! File storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// File storage configuration for uploaded images and videos
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored files; served read-only under `/storage`
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Base URL prepended to generated file URLs. Empty means relative
    /// URLs ("/storage/...").
    #[serde(default)]
    pub public_base_url: String,

    /// Maximum accepted image upload size in bytes
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,

    /// Maximum accepted video upload size in bytes
    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: u64,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root.as_os_str().is_empty() {
            return Err(ValidationError::MissingStorageRoot);
        }
        if !self.public_base_url.is_empty()
            && !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidPublicBaseUrl);
        }
        if self.max_image_bytes == 0 || self.max_video_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            public_base_url: String::new(),
            max_image_bytes: default_max_image_bytes(),
            max_video_bytes: default_max_video_bytes(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("storage")
}

fn default_max_image_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_max_video_bytes() -> u64 {
    200 * 1024 * 1024
}
