//! Axum router configuration for video endpoints.

use axum::routing::{delete, get};
use axum::Router;

use super::handlers::{create_video, delete_video, list_videos, videos_by_coach, VideoAppState};

/// Creates the video router.
///
/// Suitable for mounting at `/api/videos`.
///
/// # Routes
///
/// - `GET /` - List all videos with their coach
/// - `POST /` - Multipart upload, creates the row
/// - `DELETE /:id` - Delete the row (stored file retained)
pub fn video_router(state: VideoAppState) -> Router {
    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route("/:id", delete(delete_video))
        .with_state(state)
}

/// Creates the coach-scoped video router.
///
/// Suitable for mounting at `/api/coaches`.
pub fn coach_video_router(state: VideoAppState) -> Router {
    Router::new()
        .route("/:coach_id/videos", get(videos_by_coach))
        .with_state(state)
}
