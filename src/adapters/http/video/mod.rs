//! HTTP adapter for video endpoints.
//!
//! Exposes coach training videos via REST API:
//! - `GET /api/videos` - All videos with their coach (admin listing)
//! - `POST /api/videos` - Multipart upload through the storage port
//! - `DELETE /api/videos/:id` - Delete the row, keep the file
//! - `GET /api/coaches/:coach_id/videos` - Public per-coach listing

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::VideoAppState;
pub use routes::{coach_video_router, video_router};
