// SPDX-License-Identifier: MIT

//! Declares which service kinds an implementing agent can handle.

use crate::service_type::ServiceTypeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct AgentTypeId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentType {
    pub id: AgentTypeId,
    pub name: String,
    pub service_types: Vec<ServiceTypeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentType {
    pub fn handles(&self, service_type_id: ServiceTypeId) -> bool {
        self.service_types.contains(&service_type_id)
    }
}
