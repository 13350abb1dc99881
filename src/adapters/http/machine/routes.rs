//! Axum router configuration for machine endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    attach_charge, create_machine, delete_machine, detach_charge, list_machines,
    machines_by_branch, show_machine, sync_charges, update_machine, MachineAppState,
};

/// Creates the machine router.
///
/// Suitable for mounting at `/api/machines`.
///
/// # Routes
///
/// - `GET /` - List machines with branch, charges and categories
/// - `POST /` - Create a machine with its associations
/// - `GET /:id` - One machine
/// - `PUT|PATCH /:id` - Partial update, replace-syncing present association sets
/// - `DELETE /:id` - Delete the machine and its associations
/// - `POST /:id/charges/sync` - Replace the charge set
/// - `POST /:id/charges/:charge_id` - Attach one charge (idempotent)
/// - `DELETE /:id/charges/:charge_id` - Detach one charge
pub fn machine_router(state: MachineAppState) -> Router {
    Router::new()
        .route("/", get(list_machines).post(create_machine))
        .route(
            "/:id",
            get(show_machine)
                .put(update_machine)
                .patch(update_machine)
                .delete(delete_machine),
        )
        .route("/:id/charges/sync", post(sync_charges))
        .route(
            "/:id/charges/:charge_id",
            post(attach_charge).delete(detach_charge),
        )
        .with_state(state)
}

/// Creates the branch-scoped machine router.
///
/// Suitable for mounting at `/api/branches`.
pub fn branch_machine_router(state: MachineAppState) -> Router {
    Router::new()
        .route("/:branch_id/machines", get(machines_by_branch))
        .with_state(state)
}
