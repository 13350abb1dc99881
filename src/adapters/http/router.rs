//! Top-level router assembly.
//!
//! Mounts every feature router under `/api`, serves stored media under
//! `/storage`, and exposes a dependency-free liveness probe. Transport
//! middleware (tracing, CORS, timeouts) is layered on by the binary so
//! tests can drive this router directly.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::config::StorageConfig;

use super::machine::{branch_machine_router, machine_router, MachineAppState};
use super::parameter::{parameter_router, ParameterAppState};
use super::upload::{upload_router, UploadAppState};
use super::video::{coach_video_router, video_router, VideoAppState};

/// Multipart framing and sibling text fields ride along with the file
/// bytes, so the request body limit sits above the stored-file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Handler state for every feature router, assembled once at startup.
#[derive(Clone)]
pub struct ApiContext {
    pub parameters: ParameterAppState,
    pub machines: MachineAppState,
    pub videos: VideoAppState,
    pub uploads: UploadAppState,
}

/// Builds the full application router.
///
/// Upload routes get their own body limits derived from the configured
/// file caps; everything else keeps the framework default.
pub fn api_router(context: ApiContext, storage: &StorageConfig) -> Router {
    let image_limit = multipart_limit(storage.max_image_bytes);
    let video_limit = multipart_limit(storage.max_video_bytes);

    Router::new()
        .nest("/api/parametres", parameter_router(context.parameters))
        .nest("/api/machines", machine_router(context.machines.clone()))
        .nest("/api/branches", branch_machine_router(context.machines))
        .nest(
            "/api/videos",
            video_router(context.videos.clone()).layer(DefaultBodyLimit::max(video_limit)),
        )
        .nest("/api/coaches", coach_video_router(context.videos))
        .nest(
            "/api/upload",
            upload_router(context.uploads).layer(DefaultBodyLimit::max(image_limit)),
        )
        .nest_service("/storage", ServeDir::new(&storage.root))
        .route("/health", get(health))
}

/// GET /health - liveness probe, touches no backing services.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn multipart_limit(file_cap: u64) -> usize {
    usize::try_from(file_cap)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_limit_sits_above_the_file_cap() {
        assert_eq!(multipart_limit(1024), 1024 + MULTIPART_OVERHEAD_BYTES);
    }

    #[test]
    fn multipart_limit_saturates_on_absurd_caps() {
        assert_eq!(multipart_limit(u64::MAX), usize::MAX);
    }
}
