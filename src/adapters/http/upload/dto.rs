//! HTTP DTOs for upload endpoints.

use serde::Serialize;

use crate::ports::StoredFile;

/// Response of a successful image upload.
///
/// `path` and `url` sit at the top level rather than under `data`;
/// this is the shape the admin panel's upload widget consumes.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub path: String,
    pub url: String,
}

impl UploadResponse {
    pub fn stored(file: StoredFile, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            path: file.path,
            url: file.url,
        }
    }
}
