//! # Contract API
//!
//! Contract instantiation, the dashboard listing, detail reads, and field
//! value writes. Values are writable only while the contract is `created`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use clm_core::{BlueprintFieldId, ContractFieldValue, ContractId};
use clm_state::Contract;
use clm_store::{ContractDetails, Dashboard, DashboardQuery, NewContract, ValueEntry};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

/// Upper bound on entries in one bulk value save.
pub const MAX_BATCH_ENTRIES: usize = 500;

/// Body for a single value write.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetValueRequest {
    /// Empty string clears the value.
    pub value: String,
}

/// Body for an atomic bulk save.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveValuesRequest {
    pub values: Vec<ValueEntry>,
}

impl Validate for SaveValuesRequest {
    fn validate(&self) -> Result<(), String> {
        if self.values.len() > MAX_BATCH_ENTRIES {
            return Err(format!(
                "values must not exceed {MAX_BATCH_ENTRIES} entries"
            ));
        }
        Ok(())
    }
}

/// Build the contracts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/contracts", get(list_contracts).post(create_contract))
        .route(
            "/v1/contracts/:id",
            get(get_contract).delete(delete_contract),
        )
        .route("/v1/contracts/:id/values", put(save_values))
        .route("/v1/contracts/:id/values/:field_id", put(set_value))
}

/// GET /v1/contracts: Dashboard listing with status counts.
#[utoipa::path(
    get,
    path = "/v1/contracts",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Filtered contracts and stats over all contracts", body = Dashboard),
        (status = 400, description = "Malformed query", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
async fn list_contracts(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Dashboard>, AppError> {
    let Query(query) = query.map_err(|err| AppError::BadRequest(err.body_text()))?;
    Ok(Json(state.repo.dashboard(&query)))
}

/// POST /v1/contracts: Instantiate a contract from a blueprint.
#[utoipa::path(
    post,
    path = "/v1/contracts",
    request_body = NewContract,
    responses(
        (status = 201, description = "Contract created in status created", body = Contract),
        (status = 404, description = "Blueprint not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
async fn create_contract(
    State(state): State<AppState>,
    body: Result<Json<NewContract>, JsonRejection>,
) -> Result<(StatusCode, Json<Contract>), AppError> {
    let req = extract_validated_json(body)?;
    let contract = state.repo.create_contract(req).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// GET /v1/contracts/:id: Contract with blueprint, values, and lifecycle view.
#[utoipa::path(
    get,
    path = "/v1/contracts/{id}",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract found", body = ContractDetails),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContractDetails>, AppError> {
    Ok(Json(state.repo.get_contract_details(ContractId(id))?))
}

/// DELETE /v1/contracts/:id: Delete a contract and its values.
#[utoipa::path(
    delete,
    path = "/v1/contracts/{id}",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
async fn delete_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_contract(ContractId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/contracts/:id/values/:field_id: Upsert one field value.
#[utoipa::path(
    put,
    path = "/v1/contracts/{id}/values/{field_id}",
    params(
        ("id" = Uuid, Path, description = "Contract ID"),
        ("field_id" = Uuid, Path, description = "Blueprint field ID"),
    ),
    request_body = SetValueRequest,
    responses(
        (status = 200, description = "Value stored", body = ContractFieldValue),
        (status = 404, description = "Contract not found", body = crate::error::ErrorBody),
        (status = 409, description = "Contract is not editable", body = crate::error::ErrorBody),
        (status = 422, description = "Bad value or foreign field", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
async fn set_value(
    State(state): State<AppState>,
    Path((id, field_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<SetValueRequest>, JsonRejection>,
) -> Result<Json<ContractFieldValue>, AppError> {
    let req = extract_json(body)?;
    let stored = state
        .repo
        .upsert_field_value(ContractId(id), BlueprintFieldId(field_id), &req.value)
        .await?;
    Ok(Json(stored))
}

/// PUT /v1/contracts/:id/values: Save a batch of values; all or nothing.
#[utoipa::path(
    put,
    path = "/v1/contracts/{id}/values",
    params(("id" = Uuid, Path, description = "Contract ID")),
    request_body = SaveValuesRequest,
    responses(
        (status = 200, description = "All values stored", body = Vec<ContractFieldValue>),
        (status = 404, description = "Contract not found", body = crate::error::ErrorBody),
        (status = 409, description = "Contract is not editable", body = crate::error::ErrorBody),
        (status = 422, description = "An entry was rejected; nothing written", body = crate::error::ErrorBody),
    ),
    tag = "contracts"
)]
async fn save_values(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<SaveValuesRequest>, JsonRejection>,
) -> Result<Json<Vec<ContractFieldValue>>, AppError> {
    let req = extract_validated_json(body)?;
    let stored = state
        .repo
        .save_field_values(ContractId(id), &req.values)
        .await?;
    Ok(Json(stored))
}
