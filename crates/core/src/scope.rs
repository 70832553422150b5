// SPDX-License-Identifier: MIT

//! `ObjectScope`: a predicate over an [`Identity`], attached to every row a
//! `List` query can return and checked by the authorizer before any action
//! is allowed to proceed.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultScopeTarget {
    pub participant_id: Option<String>,
    pub provider_id: Option<String>,
    pub consumer_id: Option<String>,
    pub agent_id: Option<String>,
}

impl DefaultScopeTarget {
    pub fn is_empty(&self) -> bool {
        self.participant_id.is_none()
            && self.provider_id.is_none()
            && self.consumer_id.is_none()
            && self.agent_id.is_none()
    }
}

/// A predicate over an identity, attached to an object (or a listing query).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObjectScope {
    /// Matches any identity unconditionally.
    AlwaysMatch,
    /// Matches per [`ObjectScope::matches`]'s rule.
    Default(DefaultScopeTarget),
}

impl ObjectScope {
    pub fn always() -> Self {
        ObjectScope::AlwaysMatch
    }

    pub fn default_scope(target: DefaultScopeTarget) -> Self {
        ObjectScope::Default(target)
    }

    /// Exact matching rule:
    /// (a) identity has neither scope field → match
    /// (b) target has no scope fields → match
    /// (c) identity has participant_id, matches any of the target's
    ///     participant/provider/consumer ids
    /// (d) identity has agent_id and target has agent_id, and they're equal
    /// (e) otherwise no match
    pub fn matches(&self, identity: &Identity) -> bool {
        match self {
            ObjectScope::AlwaysMatch => true,
            ObjectScope::Default(target) => {
                let scope = &identity.scope;
                if scope.participant_id.is_none() && scope.agent_id.is_none() {
                    return true;
                }
                if target.is_empty() {
                    return true;
                }
                if let Some(pid) = &scope.participant_id {
                    if Some(pid) == target.participant_id.as_ref()
                        || Some(pid) == target.provider_id.as_ref()
                        || Some(pid) == target.consumer_id.as_ref()
                    {
                        return true;
                    }
                }
                if let (Some(aid), Some(target_aid)) = (&scope.agent_id, &target.agent_id) {
                    if aid == target_aid {
                        return true;
                    }
                }
                false
            }
        }
    }
}

/// Bypass semantics used by callers that may or may not have a per-row scope
/// (e.g. an `Option<ObjectScope>` on a not-yet-persisted draft): a `None`
/// scope is treated as allowed.
pub fn matches_optional(scope: Option<&ObjectScope>, identity: &Identity) -> bool {
    match scope {
        Some(scope) => scope.matches(identity),
        None => true,
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
