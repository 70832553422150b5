// SPDX-License-Identifier: MIT

//! Shared application state: one `Store` behind an `Arc` so axum can
//! cheaply clone it per request, plus the orchestrator's tunables.

use fulcrum_core::SystemClock;
use fulcrum_orchestrator::Orchestrator;
use fulcrum_store::Store;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub job_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store, job_timeout: fulcrum_orchestrator::DEFAULT_JOB_TIMEOUT }
    }

    /// A fresh orchestrator borrowing the store for the lifetime of one
    /// handler call. Cheap enough to build per request — it carries no
    /// state of its own beyond the borrow and the tunable.
    pub fn orchestrator(&self) -> Orchestrator<'_, SystemClock> {
        Orchestrator::new(&self.store, SystemClock).with_job_timeout(self.job_timeout)
    }
}
