// SPDX-License-Identifier: MIT

//! The two small traits every stored record implements: a stable id for
//! keying the in-memory map, and the scope an authorization check matches
//! against when a caller lists many records at once.

use fulcrum_core::{
    Agent, AgentId, AgentType, AgentTypeId, AuditEntry, AuditEntryId, Broker, BrokerId,
    DefaultScopeTarget, Job, JobId, MetricType, MetricTypeId, ObjectScope, Participant,
    ParticipantId, Provider, ProviderId, Service, ServiceGroup, ServiceGroupId, ServiceId,
    ServiceType, ServiceTypeId, Token, TokenId,
};

pub trait Entity: Clone + Send + Sync + 'static {
    type Id: std::hash::Hash + Eq + Ord + Clone + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// The scope a caller's identity must match to see this record in a
    /// listing. Defaults to unconditional visibility; entities tied to a
    /// provider/participant/agent override this.
    fn scope(&self) -> ObjectScope {
        ObjectScope::always()
    }
}

macro_rules! plain_entity {
    ($ty:ty, $id:ty) => {
        impl Entity for $ty {
            type Id = $id;
            fn id(&self) -> Self::Id {
                self.id.clone()
            }
        }
    };
}

plain_entity!(Provider, ProviderId);
plain_entity!(Participant, ParticipantId);
plain_entity!(Broker, BrokerId);
plain_entity!(AgentType, AgentTypeId);
plain_entity!(ServiceType, ServiceTypeId);
plain_entity!(MetricType, MetricTypeId);
plain_entity!(AuditEntry, AuditEntryId);

impl Entity for Agent {
    type Id = AgentId;
    fn id(&self) -> Self::Id {
        self.id.clone()
    }
    fn scope(&self) -> ObjectScope {
        ObjectScope::default_scope(DefaultScopeTarget {
            provider_id: Some(self.provider_id.to_string()),
            agent_id: Some(self.id.to_string()),
            ..Default::default()
        })
    }
}

impl Entity for Service {
    type Id = ServiceId;
    fn id(&self) -> Self::Id {
        self.id.clone()
    }
    fn scope(&self) -> ObjectScope {
        ObjectScope::default_scope(DefaultScopeTarget {
            agent_id: Some(self.agent_id.to_string()),
            ..Default::default()
        })
    }
}

impl Entity for ServiceGroup {
    type Id = ServiceGroupId;
    fn id(&self) -> Self::Id {
        self.id.clone()
    }
    fn scope(&self) -> ObjectScope {
        ObjectScope::default_scope(DefaultScopeTarget {
            consumer_id: Some(self.broker_id.to_string()),
            ..Default::default()
        })
    }
}

impl Entity for Job {
    type Id = JobId;
    fn id(&self) -> Self::Id {
        self.id.clone()
    }
    fn scope(&self) -> ObjectScope {
        match &self.claimed_by {
            // Unclaimed jobs must stay visible to every agent so one can
            // claim them; once claimed, only that agent (or an
            // admin/participant) sees it in a listing.
            None => ObjectScope::always(),
            Some(agent_id) => ObjectScope::default_scope(DefaultScopeTarget {
                agent_id: Some(agent_id.to_string()),
                ..Default::default()
            }),
        }
    }
}

impl Entity for Token {
    type Id = TokenId;
    fn id(&self) -> Self::Id {
        self.id.clone()
    }
    fn scope(&self) -> ObjectScope {
        match self.scope_id.as_deref() {
            None => ObjectScope::always(),
            Some(scope_id) => {
                let mut parts = scope_id.splitn(2, ':');
                let participant_id = parts.next().map(str::to_string);
                let agent_id = parts.next().map(str::to_string);
                ObjectScope::default_scope(DefaultScopeTarget {
                    participant_id,
                    agent_id,
                    ..Default::default()
                })
            }
        }
    }
}
