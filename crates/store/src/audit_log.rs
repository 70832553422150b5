// SPDX-License-Identifier: MIT

//! Append-only audit log: every mutating operation appends one entry in
//! the same call that performs the mutation, never edited afterwards.

use fulcrum_core::AuditEntry;
use parking_lot::RwLock;

#[derive(Default)]
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: AuditEntry) {
        self.entries.write().push(entry);
    }

    pub fn for_entity(&self, entity_id: &str) -> Vec<AuditEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.entity_id.as_deref() == Some(entity_id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulcrum_core::{AuthorityType, EventType, IdentityId};

    #[test]
    fn append_is_queryable_by_entity() {
        let log = AuditLog::new();
        let entry = AuditEntry::new(
            AuthorityType::Admin,
            IdentityId::new(),
            EventType::Created,
            "svc-1",
            serde_json::json!({}),
            chrono::Utc::now(),
        );
        log.append(entry);
        assert_eq!(log.for_entity("svc-1").len(), 1);
        assert_eq!(log.for_entity("svc-2").len(), 0);
    }
}
