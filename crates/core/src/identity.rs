// SPDX-License-Identifier: MIT

//! Authenticated principal: role + scope.

use crate::id::short;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of a resolved identity (not necessarily persisted).
    pub struct IdentityId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Participant,
    Agent,
}

crate::simple_display! {
    Role {
        Admin => "admin",
        Participant => "participant",
        Agent => "agent",
    }
}

/// The identity-side scope fields. Populated according to role:
/// `admin` → both nil, `participant` → `participant_id` only,
/// `agent` → both `participant_id` and `agent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityScope {
    pub participant_id: Option<String>,
    pub agent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub role: Role,
    pub scope: IdentityScope,
}

impl Identity {
    /// Construct an identity, enforcing that each role carries exactly the
    /// scope fields it requires.
    pub fn new(
        name: impl Into<String>,
        role: Role,
        scope: IdentityScope,
    ) -> Result<Self, InvalidIdentity> {
        match role {
            Role::Admin => {
                if scope.participant_id.is_some() || scope.agent_id.is_some() {
                    return Err(InvalidIdentity(
                        "admin identity must not carry a scope".into(),
                    ));
                }
            }
            Role::Participant => {
                if scope.participant_id.is_none() {
                    return Err(InvalidIdentity(
                        "participant identity requires participant_id".into(),
                    ));
                }
            }
            Role::Agent => {
                if scope.participant_id.is_none() || scope.agent_id.is_none() {
                    return Err(InvalidIdentity(
                        "agent identity requires both participant_id and agent_id".into(),
                    ));
                }
            }
        }
        Ok(Self {
            id: IdentityId::new(),
            name: name.into(),
            role,
            scope,
        })
    }

    pub fn log(&self) -> String {
        format!("{}:{}", self.role, short(&self.id, 8))
    }
}

#[derive(Debug, Clone)]
pub struct InvalidIdentity(pub String);

impl std::fmt::Display for InvalidIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid identity: {}", self.0)
    }
}

impl std::error::Error for InvalidIdentity {}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
