// SPDX-License-Identifier: MIT

//! Two-stage metrics pipeline: a bounded buffer collecting samples as the
//! VM manager and job loop observe them, and a reporter that periodically
//! drains the buffer and submits the batch without holding the buffer's
//! lock across the network call.

use crate::client::FulcrumClient;
use crate::error::AgentResult;
use crate::vm_manager::{Vm, VmState};
use fulcrum_core::{AgentId, MetricEntry, ServiceId};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::time::Duration as StdDuration;

pub const METRIC_VM_STATE_CHANGE: &str = "vm.state_change";
pub const METRIC_VM_OPERATION_DURATION: &str = "vm.operation.duration";
pub const METRIC_VM_OPERATION_FAILURE: &str = "vm.operation.failure";
pub const METRIC_VM_COUNT: &str = "vm.count";
pub const METRIC_VM_CPU_USAGE: &str = "vm.cpu.usage";
pub const METRIC_VM_MEMORY_USAGE: &str = "vm.memory.usage";
pub const METRIC_VM_DISK_USAGE: &str = "vm.disk.usage";
pub const METRIC_VM_NETWORK_THROUGHPUT: &str = "vm.network.throughput";

fn default_registered_types() -> HashSet<String> {
    [
        METRIC_VM_STATE_CHANGE,
        METRIC_VM_OPERATION_DURATION,
        METRIC_VM_OPERATION_FAILURE,
        METRIC_VM_COUNT,
        METRIC_VM_CPU_USAGE,
        METRIC_VM_MEMORY_USAGE,
        METRIC_VM_DISK_USAGE,
        METRIC_VM_NETWORK_THROUGHPUT,
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Bounded, mutex-protected, process-local sample queue. Not persisted —
/// a crash between ticks loses whatever hasn't been reported yet.
pub struct MetricBuffer {
    entries: Mutex<VecDeque<MetricEntry>>,
    capacity: usize,
    agent_id: Mutex<Option<AgentId>>,
    registered_types: HashSet<String>,
}

impl MetricBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            agent_id: Mutex::new(None),
            registered_types: default_registered_types(),
        }
    }

    pub fn set_agent_id(&self, agent_id: AgentId) {
        *self.agent_id.lock() = Some(agent_id);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record_vm_state_change(&self, service_id: ServiceId, old: VmState, new: VmState, now: chrono::DateTime<chrono::Utc>) {
        let mut entry = MetricEntry::new(METRIC_VM_STATE_CHANGE, 1.0, now);
        entry.service_id = Some(service_id.to_string());
        entry.resource_id = Some(format!("{old:?}->{new:?}"));
        self.push(entry);
    }

    pub fn record_vm_operation_duration(&self, service_id: ServiceId, operation: &str, duration: StdDuration, now: chrono::DateTime<chrono::Utc>) {
        let mut entry = MetricEntry::new(METRIC_VM_OPERATION_DURATION, duration.as_secs_f64(), now);
        entry.service_id = Some(service_id.to_string());
        entry.resource_id = Some(operation.to_string());
        self.push(entry);
    }

    pub fn record_vm_operation_failure(&self, service_id: ServiceId, operation: &str, now: chrono::DateTime<chrono::Utc>) {
        let mut entry = MetricEntry::new(METRIC_VM_OPERATION_FAILURE, 1.0, now);
        entry.service_id = Some(service_id.to_string());
        entry.resource_id = Some(operation.to_string());
        self.push(entry);
    }

    pub fn record_vm_resource_usage(&self, vm: &Vm, now: chrono::DateTime<chrono::Utc>) {
        for (type_name, value) in [
            (METRIC_VM_CPU_USAGE, vm.cpu_usage),
            (METRIC_VM_MEMORY_USAGE, vm.memory_usage),
            (METRIC_VM_DISK_USAGE, vm.disk_usage),
            (METRIC_VM_NETWORK_THROUGHPUT, vm.network_throughput),
        ] {
            let mut entry = MetricEntry::new(type_name, value, now);
            entry.service_id = Some(vm.service_id.to_string());
            self.push(entry);
        }
    }

    pub fn record_vm_count(&self, count: usize, now: chrono::DateTime<chrono::Utc>) {
        self.push(MetricEntry::new(METRIC_VM_COUNT, count as f64, now));
    }

    /// Custom agent-defined metric; dropped silently if `type_name` isn't
    /// one this buffer was built to recognize.
    pub fn record_agent_metric(&self, type_name: &str, value: f64, now: chrono::DateTime<chrono::Utc>) {
        self.push(MetricEntry::new(type_name, value, now));
    }

    fn push(&self, mut entry: MetricEntry) {
        if !self.registered_types.contains(&entry.type_name) {
            return;
        }
        let Some(agent_id) = *self.agent_id.lock() else {
            return;
        };
        entry.agent_id = Some(agent_id);

        let mut entries = self.entries.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Swap the buffer for a fresh empty one, returning whatever had
    /// accumulated. Callers submit the drained batch with the lock
    /// already released.
    fn drain(&self) -> Vec<MetricEntry> {
        let mut entries = self.entries.lock();
        std::mem::replace(&mut *entries, VecDeque::with_capacity(self.capacity)).into_iter().collect()
    }
}

/// Drains a [`MetricBuffer`] on a report tick and submits each entry with
/// an individual POST. The first submission failure aborts the tick —
/// remaining drained entries and anything accumulated after the drain
/// are simply lost, per the no-retry design.
pub async fn report_once(buffer: &MetricBuffer, client: &FulcrumClient) -> AgentResult<usize> {
    let batch = buffer.drain();
    let count = batch.len();
    for entry in &batch {
        client.submit_metric(entry).await?;
    }
    Ok(count)
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
