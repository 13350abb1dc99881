//! HTTP handlers for upload endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::response::{
    bad_request, storage_error_response, upload_rejection_message, validation_failed, FieldErrors,
};
use crate::ports::{extension_of, FileStorage, StorageArea, StorageError};

use super::dto::UploadResponse;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UploadAppState {
    pub storage: Arc<dyn FileStorage>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/upload/image - Store an image under the uploads area
///
/// Multipart form with a single `image` file field.
pub async fn store_image(
    State(state): State<UploadAppState>,
    mut multipart: Multipart,
) -> Response {
    let mut image: Option<(String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return bad_request("Invalid multipart payload"),
        };

        if field.name() == Some("image") {
            let filename = field.file_name().map(str::to_string).unwrap_or_default();
            match field.bytes().await {
                Ok(bytes) => image = Some((filename, bytes)),
                Err(_) => return bad_request("Invalid multipart payload"),
            }
        }
    }

    let mut errors = FieldErrors::new();
    let (filename, bytes) = match &image {
        None => {
            errors.add("image", "The image field is required.");
            return validation_failed(errors);
        }
        Some((filename, bytes)) => (filename.clone(), bytes.clone()),
    };

    match extension_of(&filename) {
        Some(ext) if StorageArea::Uploads.allows_extension(&ext) => {}
        Some(ext) => {
            errors.add(
                "image",
                upload_rejection_message("image", &StorageError::unsupported_type(ext)),
            );
            return validation_failed(errors);
        }
        None => {
            errors.add(
                "image",
                upload_rejection_message("image", &StorageError::unsupported_type("")),
            );
            return validation_failed(errors);
        }
    }

    match state
        .storage
        .store(StorageArea::Uploads, &filename, &bytes)
        .await
    {
        Ok(stored) => (
            StatusCode::OK,
            Json(UploadResponse::stored(stored, "Image uploaded successfully")),
        )
            .into_response(),
        Err(e) => storage_error_response(e, "image", "Failed to upload image"),
    }
}
