// SPDX-License-Identifier: MIT

//! Reference token-authentication strategy: hash the presented token,
//! look it up, reject if missing or expired, materialize an [`Identity`]
//! from the token's role and scope.

use crate::authenticator::Authenticator;
use async_trait::async_trait;
use fulcrum_core::{token::hash_token, Clock, CoreError, CoreResult, Identity, IdentityScope, Role, Token};

/// Abstracts the lookup-by-hash call so this crate never depends on the
/// storage crate directly; `fulcrum-store`'s token repository implements
/// this.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    async fn find_by_hash(&self, hashed_value: &str) -> CoreResult<Option<Token>>;
}

pub struct TokenAuthenticator<L, C> {
    lookup: L,
    clock: C,
}

impl<L: TokenLookup, C: Clock> TokenAuthenticator<L, C> {
    pub fn new(lookup: L, clock: C) -> Self {
        Self { lookup, clock }
    }
}

#[async_trait]
impl<L: TokenLookup + Send + Sync, C: Clock> Authenticator for TokenAuthenticator<L, C> {
    async fn authenticate(&self, token: &str) -> CoreResult<Identity> {
        let hashed = hash_token(token);
        let record = self
            .lookup
            .find_by_hash(&hashed)
            .await?
            .ok_or_else(|| CoreError::unauthenticated("unknown bearer token"))?;

        if record.is_expired(self.clock.now()) {
            return Err(CoreError::unauthenticated("bearer token has expired"));
        }

        let scope = scope_for(&record);
        Identity::new(record.name.clone(), record.role, scope)
            .map_err(|e| CoreError::internal(format!("token materialized an invalid identity: {e}")))
    }
}

/// A token's `scope_id` is interpreted per its role: a participant token
/// scopes to itself, an agent token scopes to both its provider and itself.
/// `scope_id` encodes `"{participant_id}"` or `"{participant_id}:{agent_id}"`.
fn scope_for(token: &Token) -> IdentityScope {
    match (token.role, token.scope_id.as_deref()) {
        (Role::Admin, _) => IdentityScope::default(),
        (Role::Participant, Some(scope_id)) => IdentityScope {
            participant_id: Some(scope_id.to_string()),
            agent_id: None,
        },
        (Role::Agent, Some(scope_id)) => {
            let mut parts = scope_id.splitn(2, ':');
            let participant_id = parts.next().map(str::to_string);
            let agent_id = parts.next().map(str::to_string);
            IdentityScope { participant_id, agent_id }
        }
        _ => IdentityScope::default(),
    }
}
