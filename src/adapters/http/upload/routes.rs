//! Axum router configuration for upload endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{store_image, UploadAppState};

/// Creates the upload router.
///
/// Suitable for mounting at `/api/upload`.
pub fn upload_router(state: UploadAppState) -> Router {
    Router::new()
        .route("/image", post(store_image))
        .with_state(state)
}
