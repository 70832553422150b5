// SPDX-License-Identifier: MIT

//! Job: an ordered unit of work that drives a service from one stable state
//! to another. At most one job per service is ever `Pending`/`Processing`.

use crate::agent::AgentId;
use crate::service::ServiceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct JobId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum JobAction {
    ServiceCreate,
    ServiceStart,
    ServiceStop,
    ServiceHotUpdate,
    ServiceColdUpdate,
    ServiceDelete,
}

crate::simple_display! {
    JobAction {
        ServiceCreate => "ServiceCreate",
        ServiceStart => "ServiceStart",
        ServiceStop => "ServiceStop",
        ServiceHotUpdate => "ServiceHotUpdate",
        ServiceColdUpdate => "ServiceColdUpdate",
        ServiceDelete => "ServiceDelete",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

crate::simple_display! {
    JobState {
        Pending => "Pending",
        Processing => "Processing",
        Completed => "Completed",
        Failed => "Failed",
    }
}

impl JobState {
    /// Whether `self -> next` is one of the three legal edges:
    /// `Pending -> Processing`, `Processing -> Completed`, `Processing -> Failed`.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Pending, JobState::Processing)
                | (JobState::Processing, JobState::Completed)
                | (JobState::Processing, JobState::Failed)
        )
    }

    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Pending | JobState::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub action: JobAction,
    pub state: JobState,
    pub priority: i32,
    pub service_id: ServiceId,
    pub claimed_by: Option<AgentId>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub resources: Option<serde_json::Value>,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(action: JobAction, service_id: ServiceId, priority: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: JobId::new(),
            action,
            state: JobState::Pending,
            priority,
            service_id,
            claimed_by: None,
            claimed_at: None,
            completed_at: None,
            error_message: None,
            resources: None,
            external_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `Processing` with `now - claimed_at > job_timeout` is timed out.
    pub fn is_timed_out(&self, now: DateTime<Utc>, job_timeout: std::time::Duration) -> bool {
        self.state == JobState::Processing
            && self
                .claimed_at
                .is_some_and(|claimed_at| now - claimed_at > chrono::Duration::from_std(job_timeout).unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
