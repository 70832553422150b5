// SPDX-License-Identifier: MIT

//! Service: desired-and-current state of a deployable unit (e.g. a VM).

use crate::agent::AgentId;
use crate::attributes::Attributes;
use crate::service_group::ServiceGroupId;
use crate::service_type::ServiceTypeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct ServiceId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ServiceState {
    Creating,
    Created,
    Starting,
    Started,
    Stopping,
    Stopped,
    HotUpdating,
    ColdUpdating,
    Deleting,
    Deleted,
    Failed,
}

crate::simple_display! {
    ServiceState {
        Creating => "Creating",
        Created => "Created",
        Starting => "Starting",
        Started => "Started",
        Stopping => "Stopping",
        Stopped => "Stopped",
        HotUpdating => "HotUpdating",
        ColdUpdating => "ColdUpdating",
        Deleting => "Deleting",
        Deleted => "Deleted",
        Failed => "Failed",
    }
}

impl ServiceState {
    /// A "transient" (`*ing`) state: reaching it always means exactly one
    /// active job is driving the matching transition.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ServiceState::Creating
                | ServiceState::Starting
                | ServiceState::Stopping
                | ServiceState::HotUpdating
                | ServiceState::ColdUpdating
                | ServiceState::Deleting
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceState::Deleted | ServiceState::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub external_id: Option<String>,
    pub agent_id: AgentId,
    pub service_type_id: ServiceTypeId,
    pub group_id: ServiceGroupId,
    pub state: ServiceState,
    pub target_state: Option<ServiceState>,
    pub current_properties: Option<serde_json::Value>,
    pub target_properties: Option<serde_json::Value>,
    pub attributes: Attributes,
    pub error_message: Option<String>,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
