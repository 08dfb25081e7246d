//! # Lifecycle API
//!
//! Status transitions and the read-only lifecycle views used to render
//! badges, progress, and the timeline.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use clm_core::ContractId;
use clm_state::{Contract, ContractStatus, LifecycleView, StatusPresentation};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Body for a status transition.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionRequest {
    pub target: ContractStatus,
}

/// Build the lifecycle router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/lifecycle", get(lifecycle_table))
        .route("/v1/contracts/:id/transition", post(transition_contract))
        .route("/v1/contracts/:id/lifecycle", get(contract_lifecycle))
}

/// POST /v1/contracts/:id/transition: Move a contract to `target`.
///
/// Leaving `created` for anything but `revoked` requires every required
/// field to be filled. The milestone for `target` is stamped on success.
#[utoipa::path(
    post,
    path = "/v1/contracts/{id}/transition",
    params(("id" = Uuid, Path, description = "Contract ID")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition applied", body = Contract),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 409, description = "Transition not allowed from the current status", body = crate::error::ErrorBody),
        (status = 422, description = "Required fields missing", body = crate::error::ErrorBody),
    ),
    tag = "lifecycle"
)]
async fn transition_contract(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
    Path(id): Path<Uuid>,
    body: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<Contract>, AppError> {
    let req = extract_json(body)?;
    let contract = state
        .repo
        .transition_contract(ContractId(id), req.target)
        .await?;
    metrics.record_transition();
    Ok(Json(contract))
}

/// GET /v1/contracts/:id/lifecycle: Status view and timeline for one contract.
#[utoipa::path(
    get,
    path = "/v1/contracts/{id}/lifecycle",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Lifecycle view", body = LifecycleView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "lifecycle"
)]
async fn contract_lifecycle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LifecycleView>, AppError> {
    Ok(Json(state.repo.lifecycle(ContractId(id))?))
}

/// GET /v1/lifecycle: Presentation and rules for every status.
#[utoipa::path(
    get,
    path = "/v1/lifecycle",
    responses((status = 200, description = "One entry per status", body = Vec<StatusPresentation>)),
    tag = "lifecycle"
)]
async fn lifecycle_table() -> Json<Vec<StatusPresentation>> {
    Json(StatusPresentation::table())
}
