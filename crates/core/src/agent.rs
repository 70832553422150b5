// SPDX-License-Identifier: MIT

//! Agent: the long-running process on provider infrastructure that claims
//! and executes jobs.

use crate::agent_type::AgentTypeId;
use crate::org::ProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

crate::define_id! {
    pub struct AgentId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AgentStatus {
    New,
    Connected,
    Disconnected,
    Error,
    Disabled,
}

crate::simple_display! {
    AgentStatus {
        New => "New",
        Connected => "Connected",
        Disconnected => "Disconnected",
        Error => "Error",
        Disabled => "Disabled",
    }
}

/// Default liveness timeout: 3x the default 60s heartbeat period.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub status: AgentStatus,
    pub last_status_update: DateTime<Utc>,
    pub tags: Vec<String>,
    pub configuration: serde_json::Value,
    pub provider_id: ProviderId,
    pub agent_type_id: AgentTypeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Status transitions are unrestricted, but always bump
    /// `last_status_update`.
    pub fn set_status(&mut self, status: AgentStatus, now: DateTime<Utc>) {
        self.status = status;
        self.last_status_update = now;
        self.updated_at = now;
    }

    /// An agent is live iff `now - last_status_update <= liveness_timeout`.
    pub fn is_live(&self, now: DateTime<Utc>, liveness_timeout: Duration) -> bool {
        let elapsed = now - self.last_status_update;
        elapsed <= chrono::Duration::from_std(liveness_timeout).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
