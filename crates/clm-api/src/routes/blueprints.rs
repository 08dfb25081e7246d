//! # Blueprint API
//!
//! Blueprint CRUD and field management. Fields are always returned in
//! presentation order (order_index, then created_at).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use clm_core::{Blueprint, BlueprintField, BlueprintFieldId, BlueprintId, BlueprintWithFields};
use clm_store::{BlueprintPatch, FieldPatch, NewBlueprint, NewField};

use crate::error::AppError;
use crate::extractors::extract_validated_json;
use crate::state::AppState;

/// Build the blueprints router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/blueprints", get(list_blueprints).post(create_blueprint))
        .route(
            "/v1/blueprints/:id",
            get(get_blueprint)
                .patch(update_blueprint)
                .delete(delete_blueprint),
        )
        .route("/v1/blueprints/:id/fields", post(add_field))
        .route("/v1/fields/:id", patch(update_field).delete(delete_field))
}

/// GET /v1/blueprints: List blueprints, newest first.
#[utoipa::path(
    get,
    path = "/v1/blueprints",
    responses((status = 200, description = "All blueprints", body = Vec<Blueprint>)),
    tag = "blueprints"
)]
async fn list_blueprints(State(state): State<AppState>) -> Json<Vec<Blueprint>> {
    Json(state.repo.list_blueprints())
}

/// POST /v1/blueprints: Create a blueprint.
#[utoipa::path(
    post,
    path = "/v1/blueprints",
    request_body = NewBlueprint,
    responses(
        (status = 201, description = "Blueprint created", body = Blueprint),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn create_blueprint(
    State(state): State<AppState>,
    body: Result<Json<NewBlueprint>, JsonRejection>,
) -> Result<(StatusCode, Json<Blueprint>), AppError> {
    let req = extract_validated_json(body)?;
    let blueprint = state.repo.create_blueprint(req).await?;
    Ok((StatusCode::CREATED, Json(blueprint)))
}

/// GET /v1/blueprints/:id: A blueprint with its ordered fields.
#[utoipa::path(
    get,
    path = "/v1/blueprints/{id}",
    params(("id" = Uuid, Path, description = "Blueprint ID")),
    responses(
        (status = 200, description = "Blueprint found", body = BlueprintWithFields),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn get_blueprint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BlueprintWithFields>, AppError> {
    Ok(Json(state.repo.get_blueprint(BlueprintId(id))?))
}

/// PATCH /v1/blueprints/:id: Rename or re-describe a blueprint.
#[utoipa::path(
    patch,
    path = "/v1/blueprints/{id}",
    params(("id" = Uuid, Path, description = "Blueprint ID")),
    request_body = BlueprintPatch,
    responses(
        (status = 200, description = "Blueprint updated", body = Blueprint),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn update_blueprint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<BlueprintPatch>, JsonRejection>,
) -> Result<Json<Blueprint>, AppError> {
    let req = extract_validated_json(body)?;
    Ok(Json(state.repo.update_blueprint(BlueprintId(id), req).await?))
}

/// DELETE /v1/blueprints/:id: Delete a blueprint and its fields.
///
/// Contracts instantiated from it are kept.
#[utoipa::path(
    delete,
    path = "/v1/blueprints/{id}",
    params(("id" = Uuid, Path, description = "Blueprint ID")),
    responses(
        (status = 204, description = "Blueprint deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn delete_blueprint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_blueprint(BlueprintId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/blueprints/:id/fields: Append a field.
#[utoipa::path(
    post,
    path = "/v1/blueprints/{id}/fields",
    params(("id" = Uuid, Path, description = "Blueprint ID")),
    request_body = NewField,
    responses(
        (status = 201, description = "Field added", body = BlueprintField),
        (status = 404, description = "Blueprint not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn add_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<NewField>, JsonRejection>,
) -> Result<(StatusCode, Json<BlueprintField>), AppError> {
    let req = extract_validated_json(body)?;
    let field = state.repo.add_field(BlueprintId(id), req).await?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// PATCH /v1/fields/:id: Update a field's type, label, layout, or order.
#[utoipa::path(
    patch,
    path = "/v1/fields/{id}",
    params(("id" = Uuid, Path, description = "Field ID")),
    request_body = FieldPatch,
    responses(
        (status = 200, description = "Field updated", body = BlueprintField),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn update_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<FieldPatch>, JsonRejection>,
) -> Result<Json<BlueprintField>, AppError> {
    let req = extract_validated_json(body)?;
    Ok(Json(state.repo.update_field(BlueprintFieldId(id), req).await?))
}

/// DELETE /v1/fields/:id: Delete a field. Stored values for it are kept.
#[utoipa::path(
    delete,
    path = "/v1/fields/{id}",
    params(("id" = Uuid, Path, description = "Field ID")),
    responses(
        (status = 204, description = "Field deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "blueprints"
)]
async fn delete_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_field(BlueprintFieldId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
