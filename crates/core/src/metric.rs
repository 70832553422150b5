// SPDX-License-Identifier: MIT

//! MetricType / MetricEntry: the typed metrics data model shared by the
//! control plane's entity store and the agent-side buffer/reporter.

use crate::agent::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct MetricTypeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Service,
    Agent,
    Resource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricType {
    pub id: MetricTypeId,
    pub name: String,
    pub entity_kind: EntityKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single recorded metric sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEntry {
    pub type_name: String,
    pub agent_id: Option<AgentId>,
    pub service_id: Option<String>,
    pub external_id: Option<String>,
    pub resource_id: Option<String>,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl MetricEntry {
    pub fn new(type_name: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            type_name: type_name.into(),
            agent_id: None,
            service_id: None,
            external_id: None,
            resource_id: None,
            value,
            timestamp,
        }
    }
}
