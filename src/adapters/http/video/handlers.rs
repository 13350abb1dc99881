//! HTTP handlers for video endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::response::{
    bad_request, domain_error_response, not_found, storage_error_response,
    upload_rejection_message, validation_failed, ApiSuccess, FieldErrors,
};
use crate::domain::video::NewVideo;
use crate::ports::{extension_of, FileStorage, StorageArea, StorageError, VideoRepository};

use super::dto::VideoResponse;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct VideoAppState {
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn FileStorage>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/videos - List all videos with their coach
pub async fn list_videos(State(state): State<VideoAppState>) -> Response {
    match state.videos.find_all().await {
        Ok(videos) => {
            let data: Vec<VideoResponse> = videos.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(ApiSuccess::data(data))).into_response()
        }
        Err(e) => domain_error_response(e, "Failed to list videos"),
    }
}

/// GET /api/coaches/:coach_id/videos - Videos of one coach
pub async fn videos_by_coach(
    State(state): State<VideoAppState>,
    Path(coach_id): Path<i64>,
) -> Response {
    match state.videos.find_by_coach(coach_id).await {
        Ok(videos) => {
            let data: Vec<VideoResponse> = videos.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(ApiSuccess::data(data))).into_response()
        }
        Err(e) => domain_error_response(e, "Failed to list videos"),
    }
}

/// POST /api/videos - Upload a video file and create its row
///
/// Multipart form: `coach_id`, `title`, optional `description`, and the
/// `video_file` itself.
pub async fn create_video(
    State(state): State<VideoAppState>,
    mut multipart: Multipart,
) -> Response {
    let mut coach_id_raw: Option<String> = None;
    let mut title_raw: Option<String> = None;
    let mut description: Option<String> = None;
    let mut video_file: Option<(String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return bad_request("Invalid multipart payload"),
        };

        let name = field.name().map(str::to_string).unwrap_or_default();
        match name.as_str() {
            "coach_id" => match field.text().await {
                Ok(value) => coach_id_raw = Some(value),
                Err(_) => return bad_request("Invalid multipart payload"),
            },
            "title" => match field.text().await {
                Ok(value) => title_raw = Some(value),
                Err(_) => return bad_request("Invalid multipart payload"),
            },
            "description" => match field.text().await {
                Ok(value) => description = Some(value),
                Err(_) => return bad_request("Invalid multipart payload"),
            },
            "video_file" => {
                let filename = field.file_name().map(str::to_string).unwrap_or_default();
                match field.bytes().await {
                    Ok(bytes) => video_file = Some((filename, bytes)),
                    Err(_) => return bad_request("Invalid multipart payload"),
                }
            }
            _ => {}
        }
    }

    let mut errors = FieldErrors::new();

    let coach_id = match coach_id_raw.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("coach_id", "The coach_id field is required.");
            None
        }
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("coach_id", "The coach_id field must be an integer.");
                None
            }
        },
    };

    if let Some(id) = coach_id {
        match state.videos.coach_exists(id).await {
            Ok(true) => {}
            Ok(false) => errors.add("coach_id", "The selected coach_id is invalid."),
            Err(e) => return domain_error_response(e, "Failed to upload video"),
        }
    }

    let title = match title_raw.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("title", "The title field is required.");
            String::new()
        }
        Some(t) if t.len() > 255 => {
            errors.add(
                "title",
                "The title field must not be greater than 255 characters.",
            );
            String::new()
        }
        Some(t) => t.to_string(),
    };

    // Extension check up front so it lands in the same 422 as the
    // field errors; the size cap is enforced by the storage adapter.
    match &video_file {
        None => errors.add("video_file", "The video_file field is required."),
        Some((filename, _)) => match extension_of(filename) {
            Some(ext) if StorageArea::Videos.allows_extension(&ext) => {}
            Some(ext) => errors.add(
                "video_file",
                upload_rejection_message("video_file", &StorageError::unsupported_type(ext)),
            ),
            None => errors.add(
                "video_file",
                upload_rejection_message("video_file", &StorageError::unsupported_type("")),
            ),
        },
    }

    if !errors.is_empty() {
        return validation_failed(errors);
    }

    let (coach_id, (filename, bytes)) = match (coach_id, video_file) {
        (Some(id), Some(file)) => (id, file),
        _ => return validation_failed(errors),
    };

    match state
        .storage
        .store(StorageArea::Videos, &filename, &bytes)
        .await
    {
        Ok(stored) => {
            let new_video = NewVideo {
                coach_id,
                title,
                description: description.filter(|d| !d.trim().is_empty()),
                video_url: stored.url,
            };
            match state.videos.create(&new_video).await {
                Ok(details) => (
                    StatusCode::CREATED,
                    Json(ApiSuccess::with_message(
                        VideoResponse::from(details),
                        "Video uploaded successfully",
                    )),
                )
                    .into_response(),
                Err(e) => domain_error_response(e, "Failed to upload video"),
            }
        }
        Err(e) => storage_error_response(e, "video_file", "Failed to upload video"),
    }
}

/// DELETE /api/videos/:id - Delete a video row
///
/// The stored file is retained; only the row goes away.
pub async fn delete_video(State(state): State<VideoAppState>, Path(id): Path<i64>) -> Response {
    match state.videos.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiSuccess::message("Video deleted successfully")),
        )
            .into_response(),
        Ok(false) => not_found("Video not found"),
        Err(e) => domain_error_response(e, "Failed to delete video"),
    }
}
