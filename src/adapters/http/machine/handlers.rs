//! HTTP handlers for machine endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::response::{
    domain_error_response, not_found, validation_failed, ApiSuccess, FieldErrors,
};
use crate::domain::machine::{MachinePatch, NewMachine};
use crate::ports::MachineRepository;

use super::dto::{
    add_missing_id_errors, CreateMachineRequest, MachineResponse, SyncChargesRequest,
    UpdateMachineRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct MachineAppState {
    pub machines: Arc<dyn MachineRepository>,
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/machines - List all machines with their relations
pub async fn list_machines(State(state): State<MachineAppState>) -> Response {
    match state.machines.find_all().await {
        Ok(machines) => {
            let data: Vec<MachineResponse> = machines.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(ApiSuccess::data(data))).into_response()
        }
        Err(e) => domain_error_response(e, "Failed to list machines"),
    }
}

/// GET /api/machines/:id - One machine with its relations
pub async fn show_machine(
    State(state): State<MachineAppState>,
    Path(id): Path<i64>,
) -> Response {
    match state.machines.find_by_id(id).await {
        Ok(Some(details)) => (
            StatusCode::OK,
            Json(ApiSuccess::data(MachineResponse::from(details))),
        )
            .into_response(),
        Ok(None) => not_found("Machine not found"),
        Err(e) => domain_error_response(e, "Failed to fetch machine"),
    }
}

/// GET /api/branches/:branch_id/machines - Machines of one branch
pub async fn machines_by_branch(
    State(state): State<MachineAppState>,
    Path(branch_id): Path<i64>,
) -> Response {
    match state.machines.find_by_branch(branch_id).await {
        Ok(machines) => {
            let data: Vec<MachineResponse> = machines.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(ApiSuccess::data(data))).into_response()
        }
        Err(e) => domain_error_response(e, "Failed to list machines"),
    }
}

/// POST /api/machines - Create a machine with its associations
pub async fn create_machine(
    State(state): State<MachineAppState>,
    Json(req): Json<CreateMachineRequest>,
) -> Response {
    let mut errors = FieldErrors::new();
    let candidate = req.validate(&mut errors);

    if let Some(new_machine) = &candidate {
        if let Some(response) =
            collect_reference_errors(&state, new_machine, &mut errors, "Failed to create machine")
                .await
        {
            return response;
        }
    }

    match candidate {
        Some(new_machine) if errors.is_empty() => {
            match state.machines.create(&new_machine).await {
                Ok(details) => (
                    StatusCode::CREATED,
                    Json(ApiSuccess::with_message(
                        MachineResponse::from(details),
                        "Machine created successfully",
                    )),
                )
                    .into_response(),
                Err(e) => domain_error_response(e, "Failed to create machine"),
            }
        }
        _ => validation_failed(errors),
    }
}

/// PUT /api/machines/:id - Partially update a machine
pub async fn update_machine(
    State(state): State<MachineAppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMachineRequest>,
) -> Response {
    match state.machines.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Machine not found"),
        Err(e) => return domain_error_response(e, "Failed to update machine"),
    }

    let mut errors = FieldErrors::new();
    let candidate = req.validate(&mut errors);

    if let Some(patch) = &candidate {
        if let Some(response) =
            collect_patch_reference_errors(&state, patch, &mut errors, "Failed to update machine")
                .await
        {
            return response;
        }
    }

    match candidate {
        Some(patch) if errors.is_empty() => match state.machines.update(id, &patch).await {
            Ok(details) => (
                StatusCode::OK,
                Json(ApiSuccess::with_message(
                    MachineResponse::from(details),
                    "Machine updated successfully",
                )),
            )
                .into_response(),
            Err(e) => domain_error_response(e, "Failed to update machine"),
        },
        _ => validation_failed(errors),
    }
}

/// DELETE /api/machines/:id - Delete a machine and its associations
pub async fn delete_machine(
    State(state): State<MachineAppState>,
    Path(id): Path<i64>,
) -> Response {
    match state.machines.delete(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiSuccess::message("Machine deleted successfully")),
        )
            .into_response(),
        Ok(false) => not_found("Machine not found"),
        Err(e) => domain_error_response(e, "Failed to delete machine"),
    }
}

/// POST /api/machines/:id/charges/sync - Replace the charge set
pub async fn sync_charges(
    State(state): State<MachineAppState>,
    Path(id): Path<i64>,
    Json(req): Json<SyncChargesRequest>,
) -> Response {
    let mut errors = FieldErrors::new();
    let charge_ids = match req.charge_ids {
        Some(ids) => ids,
        None => {
            errors.add("charge_ids", "The charge_ids field is required.");
            return validation_failed(errors);
        }
    };

    if !charge_ids.is_empty() {
        match state.machines.missing_charges(&charge_ids).await {
            Ok(missing) => add_missing_id_errors(&mut errors, "charge_ids", &charge_ids, &missing),
            Err(e) => return domain_error_response(e, "Failed to sync charges"),
        }
    }
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match state.machines.sync_charges(id, &charge_ids).await {
        Ok(details) => (
            StatusCode::OK,
            Json(ApiSuccess::with_message(
                MachineResponse::from(details),
                "Charges synchronized successfully",
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e, "Failed to sync charges"),
    }
}

/// POST /api/machines/:id/charges/:charge_id - Attach one charge
pub async fn attach_charge(
    State(state): State<MachineAppState>,
    Path((id, charge_id)): Path<(i64, i64)>,
) -> Response {
    match state.machines.attach_charge(id, charge_id).await {
        Ok(details) => (
            StatusCode::OK,
            Json(ApiSuccess::with_message(
                MachineResponse::from(details),
                "Charge attached successfully",
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e, "Failed to attach charge"),
    }
}

/// DELETE /api/machines/:id/charges/:charge_id - Detach one charge
pub async fn detach_charge(
    State(state): State<MachineAppState>,
    Path((id, charge_id)): Path<(i64, i64)>,
) -> Response {
    match state.machines.detach_charge(id, charge_id).await {
        Ok(details) => (
            StatusCode::OK,
            Json(ApiSuccess::with_message(
                MachineResponse::from(details),
                "Charge detached successfully",
            )),
        )
            .into_response(),
        Err(e) => domain_error_response(e, "Failed to detach charge"),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Referential checks
// ════════════════════════════════════════════════════════════════════════════

/// Checks the branch and association ids of a create request against
/// the repository, accumulating messages. Returns a response only when
/// a check itself failed.
async fn collect_reference_errors(
    state: &MachineAppState,
    new_machine: &NewMachine,
    errors: &mut FieldErrors,
    context: &str,
) -> Option<Response> {
    match state.machines.branch_exists(new_machine.branch_id).await {
        Ok(true) => {}
        Ok(false) => errors.add("branch_id", "The selected branch_id is invalid."),
        Err(e) => return Some(domain_error_response(e, context)),
    }

    if !new_machine.charge_ids.is_empty() {
        match state.machines.missing_charges(&new_machine.charge_ids).await {
            Ok(missing) => {
                add_missing_id_errors(errors, "charge_ids", &new_machine.charge_ids, &missing)
            }
            Err(e) => return Some(domain_error_response(e, context)),
        }
    }

    if !new_machine.category_ids.is_empty() {
        match state
            .machines
            .missing_categories(&new_machine.category_ids)
            .await
        {
            Ok(missing) => {
                add_missing_id_errors(errors, "category_ids", &new_machine.category_ids, &missing)
            }
            Err(e) => return Some(domain_error_response(e, context)),
        }
    }

    None
}

/// Same referential checks for the fields present in an update patch.
async fn collect_patch_reference_errors(
    state: &MachineAppState,
    patch: &MachinePatch,
    errors: &mut FieldErrors,
    context: &str,
) -> Option<Response> {
    if let Some(branch_id) = patch.branch_id {
        match state.machines.branch_exists(branch_id).await {
            Ok(true) => {}
            Ok(false) => errors.add("branch_id", "The selected branch_id is invalid."),
            Err(e) => return Some(domain_error_response(e, context)),
        }
    }

    if let Some(charge_ids) = &patch.charge_ids {
        if !charge_ids.is_empty() {
            match state.machines.missing_charges(charge_ids).await {
                Ok(missing) => add_missing_id_errors(errors, "charge_ids", charge_ids, &missing),
                Err(e) => return Some(domain_error_response(e, context)),
            }
        }
    }

    if let Some(category_ids) = &patch.category_ids {
        if !category_ids.is_empty() {
            match state.machines.missing_categories(category_ids).await {
                Ok(missing) => {
                    add_missing_id_errors(errors, "category_ids", category_ids, &missing)
                }
                Err(e) => return Some(domain_error_response(e, context)),
            }
        }
    }

    None
}
