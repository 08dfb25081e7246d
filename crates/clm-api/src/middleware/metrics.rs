//! # Request Metrics
//!
//! Lightweight request metrics using atomic counters, reported as JSON
//! at `GET /metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Shared metrics state.
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    pub request_count: Arc<AtomicU64>,
    pub error_count: Arc<AtomicU64>,
    pub transition_count: Arc<AtomicU64>,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            error_count: Arc::new(AtomicU64::new(0)),
            transition_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return current request count.
    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Return current error count (4xx and 5xx responses).
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Return the number of successful status transitions.
    pub fn transitions(&self) -> u64 {
        self.transition_count.load(Ordering::Relaxed)
    }

    pub fn record_transition(&self) {
        self.transition_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            errors: self.errors(),
            transitions: self.transitions(),
        }
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, ToSchema)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
    pub transitions: u64,
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_report))
}

/// GET /metrics: Current request counters.
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Counter snapshot", body = MetricsSnapshot)),
    tag = "operations"
)]
pub(crate) async fn metrics_report(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(
            m.snapshot(),
            MetricsSnapshot {
                requests: 0,
                errors: 0,
                transitions: 0
            }
        );
    }

    #[test]
    fn clones_share_counters() {
        let m = ApiMetrics::new();
        let other = m.clone();
        other.record_transition();
        other.request_count.fetch_add(2, Ordering::Relaxed);
        assert_eq!(m.transitions(), 1);
        assert_eq!(m.requests(), 2);
    }
}
