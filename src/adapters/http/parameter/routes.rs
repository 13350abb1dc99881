//! Axum router configuration for parameter endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    bulk_upsert_parameters, delete_parameter, list_parameters, public_parameters, show_parameter,
    update_parameter, upsert_parameter, ParameterAppState,
};

/// Creates the parameter router.
///
/// Suitable for mounting at `/api/parametres`.
///
/// # Routes
///
/// - `GET /` - List raw rows (`?groupe=` filters)
/// - `POST /` - Upsert by key
/// - `GET /public` - Decoded cache-backed value map (`?groupe=` filters)
/// - `POST /bulk` - Upsert several keys at once
/// - `GET /:cle` - One raw row by key
/// - `PUT|PATCH /:id` - Partial update by id
/// - `DELETE /:id` - Delete by id
pub fn parameter_router(state: ParameterAppState) -> Router {
    Router::new()
        .route("/", get(list_parameters).post(upsert_parameter))
        .route("/public", get(public_parameters))
        .route("/bulk", post(bulk_upsert_parameters))
        .route(
            "/:cle",
            get(show_parameter)
                .put(update_parameter)
                .patch(update_parameter)
                .delete(delete_parameter),
        )
        .with_state(state)
}
