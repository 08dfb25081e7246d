//! # clm-api: HTTP API for the Contract Lifecycle Manager
//!
//! Serves blueprints, contracts, field values, and the contract status
//! lifecycle over JSON. All state lives in a [`clm_store::Repository`],
//! optionally written through to Postgres.
//!
//! ## API Surface
//!
//! | Prefix                       | Module                    |
//! |------------------------------|---------------------------|
//! | `/v1/blueprints/*`, `/v1/fields/*` | [`routes::blueprints`] |
//! | `/v1/contracts/*`            | [`routes::contracts`]     |
//! | `/v1/contracts/:id/transition`, `/v1/lifecycle` | [`routes::lifecycle`] |
//! | `/metrics`                   | [`middleware::metrics`]   |
//! | `/openapi.json`              | [`openapi`]               |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) sit outside the metrics and trace layers.
pub fn app(state: AppState) -> Router {
    app_with_metrics(state, ApiMetrics::new())
}

/// Like [`app`], counting into a caller-supplied [`ApiMetrics`].
pub fn app_with_metrics(state: AppState, metrics: ApiMetrics) -> Router {
    let api = Router::new()
        .merge(routes::blueprints::router())
        .merge(routes::contracts::router())
        .merge(routes::lifecycle::router())
        .merge(middleware::metrics::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(metrics))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 once state is hydrated and the router is built.
async fn readiness() -> &'static str {
    "ready"
}
