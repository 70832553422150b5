// SPDX-License-Identifier: MIT

//! The aggregate in-memory store: one repository per entity kind, plus
//! the audit log and metric log, behind a single write mutex so compound
//! operations (mutate + append audit entry) apply atomically.

use crate::audit_log::AuditLog;
use crate::metric_log::MetricLog;
use crate::repository::InMemoryRepository;
use fulcrum_core::{
    Agent, AgentType, Broker, Job, MetricType, Participant, Provider, Service, ServiceGroup,
    ServiceType, Token,
};
use parking_lot::{Mutex, MutexGuard};

#[derive(Default)]
pub struct Store {
    pub providers: InMemoryRepository<Provider>,
    pub participants: InMemoryRepository<Participant>,
    pub brokers: InMemoryRepository<Broker>,
    pub agents: InMemoryRepository<Agent>,
    pub agent_types: InMemoryRepository<AgentType>,
    pub service_types: InMemoryRepository<ServiceType>,
    pub service_groups: InMemoryRepository<ServiceGroup>,
    pub services: InMemoryRepository<Service>,
    pub jobs: InMemoryRepository<Job>,
    pub metric_types: InMemoryRepository<MetricType>,
    pub tokens: InMemoryRepository<Token>,
    pub audit_log: AuditLog,
    pub metric_log: MetricLog,
    /// Serializes compound writes so "mutate state, append audit entry"
    /// pairs never interleave across concurrent callers.
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            providers: InMemoryRepository::new("provider"),
            participants: InMemoryRepository::new("participant"),
            brokers: InMemoryRepository::new("broker"),
            agents: InMemoryRepository::new("agent"),
            agent_types: InMemoryRepository::new("agent_type"),
            service_types: InMemoryRepository::new("service_type"),
            service_groups: InMemoryRepository::new("service_group"),
            services: InMemoryRepository::new("service"),
            jobs: InMemoryRepository::new("job"),
            metric_types: InMemoryRepository::new("metric_type"),
            tokens: InMemoryRepository::new("token"),
            audit_log: AuditLog::new(),
            metric_log: MetricLog::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Hold this across a mutation plus its audit-log append so the two
    /// can never be observed half-done by a concurrent reader of the log.
    /// Readers (`get`/`list`) never need this — only multi-step writes do.
    pub fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use fulcrum_core::{AuditEntry, AuthorityType, EventType, IdentityId, ProviderId};

    #[tokio::test]
    async fn write_guard_pairs_mutation_with_audit_append() {
        let store = Store::new();
        let now = chrono::Utc::now();
        let provider = Provider {
            id: ProviderId::new(),
            name: "acme".into(),
            country_code: None,
            attributes: Default::default(),
            created_at: now,
            updated_at: now,
        };
        let provider_id = provider.id;

        {
            let _guard = store.write_guard();
            store.providers.create(provider).await.unwrap();
            store.audit_log.append(AuditEntry::new(
                AuthorityType::Admin,
                IdentityId::new(),
                EventType::Created,
                provider_id.to_string(),
                serde_json::json!({}),
                now,
            ));
        }

        assert_eq!(store.audit_log.len(), 1);
        assert!(store.providers.find(&provider_id).await.unwrap().is_some());
    }
}
