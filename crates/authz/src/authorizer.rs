// SPDX-License-Identifier: MIT

//! Authorization: rule-table lookup followed by an object-scope match.

use crate::rules::{rule_table, Action, ObjectType};
use async_trait::async_trait;
use fulcrum_core::{CoreError, CoreResult, Identity, ObjectScope, Role};

/// Looks up the provider that owns a given agent, by its string id, so
/// token-creation checks can compare it against a participant's own id
/// without this crate depending on the store crate.
#[async_trait]
pub trait AgentProviderLookup: Send + Sync {
    async fn provider_of_agent(&self, agent_id: &str) -> CoreResult<Option<String>>;
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(
        &self,
        identity: &Identity,
        action: Action,
        object: ObjectType,
        scope: &ObjectScope,
    ) -> CoreResult<()>;
}

pub struct DefaultAuthorizer<L> {
    provider_lookup: L,
}

impl<L: AgentProviderLookup> DefaultAuthorizer<L> {
    pub fn new(provider_lookup: L) -> Self {
        Self { provider_lookup }
    }

    fn rule_permits(&self, role: Role, action: Action, object: ObjectType) -> bool {
        rule_table()
            .iter()
            .any(|rule| rule.object == object && rule.action == action && rule.roles.contains(&role))
    }
}

#[async_trait]
impl<L: AgentProviderLookup> Authorizer for DefaultAuthorizer<L> {
    async fn authorize(
        &self,
        identity: &Identity,
        action: Action,
        object: ObjectType,
        scope: &ObjectScope,
    ) -> CoreResult<()> {
        // Token generation has its own eligibility rule beyond the plain
        // rule table: who a participant may mint a token *for*.
        if object == ObjectType::Token && action == Action::Generate {
            return self.authorize_token_generation(identity, scope).await;
        }

        if !self.rule_permits(identity.role, action, object) {
            return Err(CoreError::unauthorized(format!(
                "{} may not {action} {object}",
                identity.role
            )));
        }

        if !scope.matches(identity) {
            return Err(CoreError::unauthorized(format!(
                "{} is out of scope for this {object}",
                identity.role
            )));
        }

        Ok(())
    }
}

impl<L: AgentProviderLookup> DefaultAuthorizer<L> {
    async fn authorize_token_generation(&self, identity: &Identity, scope: &ObjectScope) -> CoreResult<()> {
        match identity.role {
            Role::Admin => Ok(()),
            Role::Agent => Err(CoreError::unauthorized("agents may not generate tokens")),
            Role::Participant => {
                let Some(own_participant_id) = identity.scope.participant_id.as_deref() else {
                    return Err(CoreError::unauthorized("participant identity missing its own scope"));
                };

                // A participant token for itself is always fine.
                if scope.matches(identity) {
                    // `ObjectScope::matches` already covers the
                    // participant-scoped case; for an agent-scoped token we
                    // still need to confirm the agent's provider really is
                    // this participant before minting on its behalf.
                    if let ObjectScope::Default(target) = scope {
                        if let Some(agent_id) = &target.agent_id {
                            return self.authorize_agent_token(own_participant_id, agent_id).await;
                        }
                    }
                    return Ok(());
                }

                Err(CoreError::unauthorized(
                    "participant may only generate tokens within its own scope",
                ))
            }
        }
    }

    async fn authorize_agent_token(&self, own_participant_id: &str, agent_id: &str) -> CoreResult<()> {
        let provider_id = self
            .provider_lookup
            .provider_of_agent(agent_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("agent {agent_id} has no known provider")))?;

        if provider_id == own_participant_id {
            Ok(())
        } else {
            Err(CoreError::unauthorized(
                "participant may only generate agent tokens for agents under its own provider",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulcrum_core::{DefaultScopeTarget, IdentityScope};

    struct FakeLookup(Option<String>);

    #[async_trait]
    impl AgentProviderLookup for FakeLookup {
        async fn provider_of_agent(&self, _agent_id: &str) -> CoreResult<Option<String>> {
            Ok(self.0.clone())
        }
    }

    fn participant(id: &str) -> Identity {
        Identity::new(
            "p",
            Role::Participant,
            IdentityScope { participant_id: Some(id.into()), agent_id: None },
        )
        .unwrap()
    }

    fn agent(participant_id: &str, agent_id: &str) -> Identity {
        Identity::new(
            "a",
            Role::Agent,
            IdentityScope { participant_id: Some(participant_id.into()), agent_id: Some(agent_id.into()) },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn agent_cannot_claim_jobs_outside_its_own_scope() {
        let authz = DefaultAuthorizer::new(FakeLookup(None));
        let identity = agent("p1", "a1");
        let scope = ObjectScope::Default(DefaultScopeTarget {
            agent_id: Some("a2".into()),
            ..Default::default()
        });
        let err = authz
            .authorize(&identity, Action::Claim, ObjectType::Job, &scope)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), fulcrum_core::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn agent_role_cannot_perform_unlisted_action() {
        let authz = DefaultAuthorizer::new(FakeLookup(None));
        let identity = agent("p1", "a1");
        let err = authz
            .authorize(&identity, Action::Delete, ObjectType::Participant, &ObjectScope::always())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), fulcrum_core::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn admin_may_always_generate_tokens() {
        let authz = DefaultAuthorizer::new(FakeLookup(None));
        let admin = Identity::new("root", Role::Admin, IdentityScope::default()).unwrap();
        authz
            .authorize(&admin, Action::Generate, ObjectType::Token, &ObjectScope::always())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn agent_role_cannot_generate_tokens() {
        let authz = DefaultAuthorizer::new(FakeLookup(None));
        let identity = agent("p1", "a1");
        let err = authz
            .authorize(&identity, Action::Generate, ObjectType::Token, &ObjectScope::always())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), fulcrum_core::ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn participant_may_generate_token_for_its_own_agent() {
        let authz = DefaultAuthorizer::new(FakeLookup(Some("p1".into())));
        let identity = participant("p1");
        let scope = ObjectScope::Default(DefaultScopeTarget {
            participant_id: Some("p1".into()),
            agent_id: Some("a1".into()),
            ..Default::default()
        });
        authz
            .authorize(&identity, Action::Generate, ObjectType::Token, &scope)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn participant_cannot_generate_token_for_another_providers_agent() {
        let authz = DefaultAuthorizer::new(FakeLookup(Some("other-provider".into())));
        let identity = participant("p1");
        let scope = ObjectScope::Default(DefaultScopeTarget {
            participant_id: Some("p1".into()),
            agent_id: Some("a1".into()),
            ..Default::default()
        });
        let err = authz
            .authorize(&identity, Action::Generate, ObjectType::Token, &scope)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), fulcrum_core::ErrorKind::Unauthorized);
    }
}
