//! HTTP adapter for parameter endpoints.
//!
//! Exposes the parameter store via REST API:
//! - `GET /api/parametres` - List raw rows
//! - `GET /api/parametres/public` - Decoded cache-backed value map
//! - `GET /api/parametres/:cle` - One raw row by key
//! - `POST /api/parametres` - Upsert by key
//! - `PUT/PATCH /api/parametres/:id` - Partial update
//! - `DELETE /api/parametres/:id` - Delete
//! - `POST /api/parametres/bulk` - Bulk upsert

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ParameterAppState;
pub use routes::parameter_router;
