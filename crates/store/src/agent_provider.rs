// SPDX-License-Identifier: MIT

//! Wires the agent repository into `fulcrum-authz`'s
//! [`AgentProviderLookup`], used by the authorizer to decide whether a
//! participant may generate a token for one of its own agents.

use crate::repository::InMemoryRepository;
use async_trait::async_trait;
use fulcrum_authz::AgentProviderLookup;
use fulcrum_core::{Agent, AgentId, CoreResult};

pub struct AgentProviderRepository<'a> {
    agents: &'a InMemoryRepository<Agent>,
}

impl<'a> AgentProviderRepository<'a> {
    pub fn new(agents: &'a InMemoryRepository<Agent>) -> Self {
        Self { agents }
    }
}

#[async_trait]
impl AgentProviderLookup for AgentProviderRepository<'_> {
    async fn provider_of_agent(&self, agent_id: &str) -> CoreResult<Option<String>> {
        let Ok(id) = AgentId::parse(agent_id) else {
            return Ok(None);
        };
        Ok(self.agents.all().into_iter().find(|a| a.id == id).map(|a| a.provider_id.to_string()))
    }
}
