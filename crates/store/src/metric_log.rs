// SPDX-License-Identifier: MIT

//! Server-side metric entry storage. Unlike the keyed entities, a
//! [`MetricEntry`] has no identity of its own — it's an append-only sample
//! keyed implicitly by `(type_name, agent_id, timestamp)`.

use chrono::{DateTime, Utc};
use fulcrum_core::{AgentId, MetricEntry};
use parking_lot::RwLock;

#[derive(Default)]
pub struct MetricLog {
    entries: RwLock<Vec<MetricEntry>>,
}

impl MetricLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entries: impl IntoIterator<Item = MetricEntry>) {
        self.entries.write().extend(entries);
    }

    pub fn for_agent(&self, agent_id: &AgentId, since: Option<DateTime<Utc>>) -> Vec<MetricEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.agent_id.as_ref() == Some(agent_id))
            .filter(|e| since.map_or(true, |since| e.timestamp >= since))
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

    #[test]
    fn filters_by_agent_and_time() {
        let log = MetricLog::new();
        let agent = AgentId::new();
        let other_agent = AgentId::new();
        let t0 = Utc::now();

        let mut e1 = MetricEntry::new("cpu.load", 0.5, t0);
        e1.agent_id = Some(agent.clone());
        let mut e2 = MetricEntry::new("cpu.load", 0.8, t0 + chrono::Duration::seconds(10));
        e2.agent_id = Some(agent.clone());
        let mut e3 = MetricEntry::new("cpu.load", 0.1, t0);
        e3.agent_id = Some(other_agent);

        log.append([e1, e2, e3]);

        let recent = log.for_agent(&agent, Some(t0 + chrono::Duration::seconds(5)));
        assert_eq!(recent.len(), 1);
        assert_eq!(log.for_agent(&agent, None).len(), 2);
    }
}
