//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contract Lifecycle Manager API",
        version = "0.1.0",
        description = "Blueprints, contracts instantiated from them, field values, and the contract status lifecycle."
    ),
    paths(
        // Blueprints
        crate::routes::blueprints::list_blueprints,
        crate::routes::blueprints::create_blueprint,
        crate::routes::blueprints::get_blueprint,
        crate::routes::blueprints::update_blueprint,
        crate::routes::blueprints::delete_blueprint,
        crate::routes::blueprints::add_field,
        crate::routes::blueprints::update_field,
        crate::routes::blueprints::delete_field,
        // Contracts
        crate::routes::contracts::list_contracts,
        crate::routes::contracts::create_contract,
        crate::routes::contracts::get_contract,
        crate::routes::contracts::delete_contract,
        crate::routes::contracts::set_value,
        crate::routes::contracts::save_values,
        // Lifecycle
        crate::routes::lifecycle::transition_contract,
        crate::routes::lifecycle::contract_lifecycle,
        crate::routes::lifecycle::lifecycle_table,
        // Operations
        crate::middleware::metrics::metrics_report,
    ),
    components(schemas(
        // Records
        clm_core::Blueprint,
        clm_core::BlueprintField,
        clm_core::BlueprintWithFields,
        clm_core::FieldType,
        clm_core::ContractFieldValue,
        clm_core::BlueprintId,
        clm_core::BlueprintFieldId,
        clm_core::ContractId,
        clm_core::FieldValueId,
        clm_state::Contract,
        clm_state::ContractStatus,
        // Lifecycle views
        clm_state::StatusPresentation,
        clm_state::LifecycleView,
        clm_state::Timeline,
        clm_state::TimelineEntry,
        // Requests and listings
        clm_store::NewBlueprint,
        clm_store::BlueprintPatch,
        clm_store::NewField,
        clm_store::FieldPatch,
        clm_store::NewContract,
        clm_store::ValueEntry,
        clm_store::ContractDetails,
        clm_store::ContractSummary,
        clm_store::Dashboard,
        clm_store::DashboardStats,
        clm_store::SortKey,
        clm_store::SortOrder,
        crate::routes::contracts::SetValueRequest,
        crate::routes::contracts::SaveValuesRequest,
        crate::routes::lifecycle::TransitionRequest,
        crate::middleware::metrics::MetricsSnapshot,
        // Errors
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "blueprints", description = "Reusable contract templates and their fields"),
        (name = "contracts", description = "Contract instances and field values"),
        (name = "lifecycle", description = "Status transitions and lifecycle views"),
        (name = "operations", description = "Service counters"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
