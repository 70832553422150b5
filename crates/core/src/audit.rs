// SPDX-License-Identifier: MIT

//! Append-only audit log. Every mutation that changes an entity must, in
//! the same transaction, append one of these. Entries are never mutated
//! after creation.

use crate::agent::AgentId;
use crate::identity::IdentityId;
use crate::org::BrokerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct AuditEntryId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityType {
    Admin,
    Participant,
    Agent,
}

/// The kind of mutation an audit entry records. Serializes as
/// `"{entity}.{verb}"`, e.g. `"service.updated"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Created,
    Updated,
    Deleted,
    StatusChanged,
}

crate::simple_display! {
    EventType {
        Created => "created",
        Updated => "updated",
        Deleted => "deleted",
        StatusChanged => "status_changed",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub authority_type: AuthorityType,
    pub authority_id: IdentityId,
    pub event_type: EventType,
    pub entity_id: Option<String>,
    pub provider_id: Option<String>,
    pub agent_id: Option<AgentId>,
    pub broker_id: Option<BrokerId>,
    /// Before/after diff, or the full properties on create.
    pub properties_or_diff: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        authority_type: AuthorityType,
        authority_id: IdentityId,
        event_type: EventType,
        entity_id: impl Into<String>,
        properties_or_diff: serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            authority_type,
            authority_id,
            event_type,
            entity_id: Some(entity_id.into()),
            provider_id: None,
            agent_id: None,
            broker_id: None,
            properties_or_diff,
            timestamp,
        }
    }
}
