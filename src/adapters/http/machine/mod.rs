//! HTTP adapter for machine endpoints.
//!
//! Exposes gym equipment via REST API:
//! - `GET /api/machines` - List machines with relations
//! - `POST /api/machines` - Create with associations, transactionally
//! - `GET /api/machines/:id` - One machine
//! - `PUT/PATCH /api/machines/:id` - Partial update
//! - `DELETE /api/machines/:id` - Delete with its associations
//! - `POST /api/machines/:id/charges/sync` - Replace the charge set
//! - `POST/DELETE /api/machines/:id/charges/:charge_id` - Attach/detach
//! - `GET /api/branches/:branch_id/machines` - Machines of one branch

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::MachineAppState;
pub use routes::{branch_machine_router, machine_router};
