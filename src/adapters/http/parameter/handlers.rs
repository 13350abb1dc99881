//! HTTP handlers for parameter endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::response::{
    domain_error_response, not_found, validation_failed, ApiSuccess, FieldErrors,
};
use crate::application::{BulkParameter, ParameterStore};

use super::dto::{
    BulkUpsertRequest, GroupQuery, ParameterResponse, UpdateParameterRequest,
    UpsertParameterRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ParameterAppState {
    pub store: Arc<ParameterStore>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/parametres - List raw parameter rows, optionally by group
pub async fn list_parameters(
    State(state): State<ParameterAppState>,
    Query(query): Query<GroupQuery>,
) -> Response {
    match state.store.list(query.groupe.as_deref()).await {
        Ok(rows) => {
            let data: Vec<ParameterResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(ApiSuccess::data(data))).into_response()
        }
        Err(e) => domain_error_response(e, "Failed to list parametres"),
    }
}

/// GET /api/parametres/public - Decoded values as a key-to-value map
pub async fn public_parameters(
    State(state): State<ParameterAppState>,
    Query(query): Query<GroupQuery>,
) -> Response {
    match state.store.get_by_group(query.groupe.as_deref()).await {
        Ok(map) => (StatusCode::OK, Json(ApiSuccess::data(map))).into_response(),
        Err(e) => domain_error_response(e, "Failed to load public parametres"),
    }
}

/// GET /api/parametres/:cle - One raw row by key
pub async fn show_parameter(
    State(state): State<ParameterAppState>,
    Path(cle): Path<String>,
) -> Response {
    match state.store.find_by_key(&cle).await {
        Ok(Some(parameter)) => (
            StatusCode::OK,
            Json(ApiSuccess::data(ParameterResponse::from(parameter))),
        )
            .into_response(),
        Ok(None) => not_found("Parametre not found"),
        Err(e) => domain_error_response(e, "Failed to fetch parametre"),
    }
}

/// POST /api/parametres - Upsert a parameter by key
pub async fn upsert_parameter(
    State(state): State<ParameterAppState>,
    Json(req): Json<UpsertParameterRequest>,
) -> Response {
    let mut errors = FieldErrors::new();
    let valid = match req.validate("", &mut errors) {
        Some(valid) => valid,
        None => return validation_failed(errors),
    };

    match state
        .store
        .set(
            &valid.key,
            &valid.value,
            valid.value_type,
            valid.group,
            valid.description,
        )
        .await
    {
        Ok(parameter) => (
            StatusCode::CREATED,
            Json(ApiSuccess::with_message(
                ParameterResponse::from(parameter),
                "Parametre saved successfully",
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e, "Failed to save parametre"),
    }
}

/// PUT /api/parametres/:id - Partially update a parameter row
pub async fn update_parameter(
    State(state): State<ParameterAppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateParameterRequest>,
) -> Response {
    // The segment doubles as the key position in the GET route, so it
    // arrives as a string; a non-numeric id can never match a row.
    let id = match id.parse::<i64>() {
        Ok(id) => id,
        Err(_) => return not_found("Parametre not found"),
    };

    let mut errors = FieldErrors::new();
    let patch = match req.validate(&mut errors) {
        Some(patch) => patch,
        None => return validation_failed(errors),
    };

    match state.store.update(id, &patch).await {
        Ok(parameter) => (
            StatusCode::OK,
            Json(ApiSuccess::with_message(
                ParameterResponse::from(parameter),
                "Parametre updated successfully",
            )),
        )
            .into_response(),
        Err(e) if e.code.is_not_found() => not_found("Parametre not found"),
        Err(e) => domain_error_response(e, "Failed to update parametre"),
    }
}

/// DELETE /api/parametres/:id - Delete a parameter row
pub async fn delete_parameter(
    State(state): State<ParameterAppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<i64>() {
        Ok(id) => id,
        Err(_) => return not_found("Parametre not found"),
    };

    match state.store.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiSuccess::message("Parametre deleted successfully")),
        )
            .into_response(),
        Ok(false) => not_found("Parametre not found"),
        Err(e) => domain_error_response(e, "Failed to delete parametre"),
    }
}

/// POST /api/parametres/bulk - Upsert several parameters in one call
pub async fn bulk_upsert_parameters(
    State(state): State<ParameterAppState>,
    Json(req): Json<BulkUpsertRequest>,
) -> Response {
    let mut errors = FieldErrors::new();
    let mut entries = Vec::with_capacity(req.parametres.len());

    for (index, entry) in req.parametres.into_iter().enumerate() {
        let prefix = format!("parametres.{}.", index);
        if let Some(valid) = entry.validate(&prefix, &mut errors) {
            entries.push(BulkParameter {
                key: valid.key,
                value: valid.value,
                value_type: valid.value_type,
                group: valid.group,
                description: valid.description,
            });
        }
    }

    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match state.store.set_many(&entries).await {
        Ok(count) => (
            StatusCode::OK,
            Json(ApiSuccess::message(format!(
                "{} parametres saved successfully",
                count
            ))),
        )
            .into_response(),
        Err(e) => domain_error_response(e, "Failed to save parametres"),
    }
}
