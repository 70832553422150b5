// SPDX-License-Identifier: MIT

//! Service type definitions: opaque resource schema plus the hot-update
//! classification that the orchestrator consults when deciding whether a
//! configuration change can be applied in place or requires a restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

crate::define_id! {
    pub struct ServiceTypeId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: ServiceTypeId,
    pub name: String,
    /// Opaque, caller-defined resource schema (cpu/memory/etc. shape).
    pub resource_definitions: serde_json::Value,
    /// Field names that can be applied as a hot update: an explicit,
    /// per-service-type allowlist. A field not in this set always
    /// triggers a cold update.
    pub hot_updatable_fields: HashSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceType {
    /// Returns true when every changed property in `diff` is hot-updatable,
    /// i.e. the requested property change can be realized without stopping
    /// the service first.
    pub fn is_hot_capable(&self, diff_keys: impl IntoIterator<Item = impl AsRef<str>>) -> bool {
        let mut saw_any = false;
        for key in diff_keys {
            saw_any = true;
            if !self.hot_updatable_fields.contains(key.as_ref()) {
                return false;
            }
        }
        saw_any
    }
}

#[cfg(test)]
#[path = "service_type_tests.rs"]
mod tests;
