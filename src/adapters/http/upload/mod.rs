//! HTTP adapter for upload endpoints.
//!
//! Exposes `POST /api/upload/image`, storing images under the uploads
//! area and returning the public path and URL.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::UploadAppState;
pub use routes::upload_router;
