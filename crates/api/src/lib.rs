// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fulcrum-api: the thin HTTP surface over the wire-protocol endpoints
//! an agent speaks to the control plane. Routing, extraction, and
//! status-code mapping live here; every decision of substance is
//! delegated to `fulcrum-authz`/`fulcrum-orchestrator`/`fulcrum-store`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/agents/me", get(handlers::get_agent_info))
        .route("/api/v1/agents/me/status", put(handlers::update_agent_status))
        .route("/api/v1/jobs/pending", get(handlers::get_pending_jobs))
        .route("/api/v1/jobs/:id/claim", post(handlers::claim_job))
        .route("/api/v1/jobs/:id/complete", post(handlers::complete_job))
        .route("/api/v1/jobs/:id/fail", post(handlers::fail_job))
        .route("/api/v1/metric-entries", post(handlers::submit_metric_entry))
        .route("/api/v1/services/:id/retry", post(handlers::retry_service))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
