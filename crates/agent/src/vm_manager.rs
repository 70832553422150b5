// SPDX-License-Identifier: MIT

//! The VM manager: a mutex-protected simulator standing in for the real
//! infrastructure a production agent would drive. Every mutating call
//! checks the current state admits the operation, releases the lock
//! across a simulated operation delay, then reacquires to commit — so an
//! observer never sees a state change mid-flight, only before or after.

use crate::error::{AgentError, AgentResult};
use fulcrum_core::ServiceId;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    Created,
    Started,
    Stopped,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct Vm {
    pub service_id: ServiceId,
    pub name: String,
    pub cpu: u32,
    pub memory: u32,
    pub state: VmState,
    pub error_message: Option<String>,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_throughput: f64,
}

impl Vm {
    fn new(service_id: ServiceId, name: String, cpu: u32, memory: u32) -> Self {
        Self {
            service_id,
            name,
            cpu,
            memory,
            state: VmState::Created,
            error_message: None,
            cpu_usage: 0.0,
            memory_usage: 0.0,
            disk_usage: 0.0,
            network_throughput: 0.0,
        }
    }
}

const CPU_RANGE: (f64, f64) = (1.0, 95.0);
const MEMORY_RANGE: (f64, f64) = (5.0, 90.0);
const DISK_RANGE: (f64, f64) = (10.0, 95.0);
const NETWORK_RANGE: (f64, f64) = (1.0, 500.0);

pub struct VmManager {
    vms: Mutex<HashMap<ServiceId, Vm>>,
    op_delay_min: Duration,
    op_delay_max: Duration,
    error_rate: f64,
}

impl VmManager {
    pub fn new(op_delay_min: Duration, op_delay_max: Duration, error_rate: f64) -> Self {
        Self { vms: Mutex::new(HashMap::new()), op_delay_min, op_delay_max, error_rate }
    }

    pub fn snapshot(&self, service_id: &ServiceId) -> Option<Vm> {
        self.vms.lock().get(service_id).cloned()
    }

    /// Every `Started` VM, for the resource-update and metrics-report loops.
    pub fn started_vms(&self) -> Vec<Vm> {
        self.vms.lock().values().filter(|vm| vm.state == VmState::Started).cloned().collect()
    }

    pub async fn create_vm(&self, service_id: ServiceId, name: String, cpu: u32, memory: u32) -> AgentResult<()> {
        if self.vms.lock().contains_key(&service_id) {
            return Err(AgentError::InvalidTransition(format!("vm {service_id} already exists")));
        }

        self.simulate_delay().await;

        if self.should_fail() {
            // Nothing was committed yet, so there's no prior state to leave
            // in place — the VM simply never comes into existence this try.
            return Err(AgentError::InvalidTransition(format!("create failed for vm {service_id}")));
        }

        let mut vm = Vm::new(service_id, name, cpu, memory);
        randomize_resources(&mut vm);
        self.vms.lock().insert(service_id, vm);
        Ok(())
    }

    pub async fn start_vm(&self, service_id: ServiceId) -> AgentResult<()> {
        self.mutate(service_id, &[VmState::Created, VmState::Stopped], VmState::Started, |_| {}).await
    }

    pub async fn stop_vm(&self, service_id: ServiceId) -> AgentResult<()> {
        self.mutate(service_id, &[VmState::Started], VmState::Stopped, |_| {}).await
    }

    pub async fn update_vm(&self, service_id: ServiceId, name: String, cpu: u32, memory: u32) -> AgentResult<()> {
        let target_state = {
            let vms = self.vms.lock();
            let vm = vms.get(&service_id).ok_or_else(|| AgentError::VmNotFound(service_id.to_string()))?;
            if !matches!(vm.state, VmState::Started | VmState::Stopped) {
                return Err(AgentError::InvalidTransition(format!("vm {service_id} is {:?}, cannot update", vm.state)));
            }
            vm.state
        };

        self.mutate(service_id, &[target_state], target_state, move |vm| {
            vm.name = name;
            vm.cpu = cpu;
            vm.memory = memory;
        })
        .await
    }

    /// Unlike the other transitions, a committed delete removes the VM
    /// from the manager entirely rather than leaving it parked in
    /// `Deleted` state — there's nothing further any op can do to it.
    pub async fn delete_vm(&self, service_id: ServiceId) -> AgentResult<()> {
        {
            let vms = self.vms.lock();
            let vm = vms.get(&service_id).ok_or_else(|| AgentError::VmNotFound(service_id.to_string()))?;
            if vm.state != VmState::Stopped {
                return Err(AgentError::InvalidTransition(format!("vm {service_id} is {:?}, cannot delete", vm.state)));
            }
        }

        self.simulate_delay().await;

        let mut vms = self.vms.lock();
        let Some(vm) = vms.get_mut(&service_id) else {
            return Err(AgentError::VmNotFound(service_id.to_string()));
        };

        if self.should_fail() {
            vm.error_message = Some("simulated failure transitioning to Deleted".into());
            return Ok(());
        }

        vms.remove(&service_id);
        Ok(())
    }

    /// Shared shape for start/stop/update/delete: validate, release the
    /// lock across the simulated delay, reacquire, then either commit the
    /// target state (running `on_commit` first) or record a failure
    /// without touching state.
    async fn mutate(
        &self,
        service_id: ServiceId,
        allowed: &[VmState],
        target: VmState,
        on_commit: impl FnOnce(&mut Vm),
    ) -> AgentResult<()> {
        {
            let vms = self.vms.lock();
            let vm = vms.get(&service_id).ok_or_else(|| AgentError::VmNotFound(service_id.to_string()))?;
            if !allowed.contains(&vm.state) {
                return Err(AgentError::InvalidTransition(format!("vm {service_id} is {:?}, cannot reach {:?}", vm.state, target)));
            }
        }

        self.simulate_delay().await;

        let mut vms = self.vms.lock();
        let Some(vm) = vms.get_mut(&service_id) else {
            return Err(AgentError::VmNotFound(service_id.to_string()));
        };

        if self.should_fail() {
            vm.error_message = Some(format!("simulated failure transitioning to {target:?}"));
            return Ok(());
        }

        on_commit(vm);
        vm.state = target;
        vm.error_message = None;
        randomize_resources(vm);
        Ok(())
    }

    async fn simulate_delay(&self) {
        let millis = {
            let mut rng = rand::thread_rng();
            let min = self.op_delay_min.as_millis() as u64;
            let max = self.op_delay_max.as_millis().max(min as u128) as u64;
            if max > min { rng.gen_range(min..=max) } else { min }
        };
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.error_rate.clamp(0.0, 1.0))
    }
}

fn randomize_resources(vm: &mut Vm) {
    let mut rng = rand::thread_rng();
    vm.cpu_usage = rng.gen_range(CPU_RANGE.0..=CPU_RANGE.1);
    vm.memory_usage = rng.gen_range(MEMORY_RANGE.0..=MEMORY_RANGE.1);
    vm.disk_usage = rng.gen_range(DISK_RANGE.0..=DISK_RANGE.1);
    vm.network_throughput = rng.gen_range(NETWORK_RANGE.0..=NETWORK_RANGE.1);
}

/// One resource-update tick: every started VM's counters take a bounded
/// random walk step, clamped to their documented ranges.
pub fn walk_resources(vm: &mut Vm) {
    let mut rng = rand::thread_rng();
    vm.cpu_usage = walk_channel(&mut rng, vm.cpu_usage, CPU_RANGE);
    vm.memory_usage = walk_channel(&mut rng, vm.memory_usage, MEMORY_RANGE);
    vm.disk_usage = walk_channel(&mut rng, vm.disk_usage, DISK_RANGE);
    vm.network_throughput = walk_channel(&mut rng, vm.network_throughput, NETWORK_RANGE);
}

fn walk_channel(rng: &mut impl Rng, current: f64, range: (f64, f64)) -> f64 {
    let span = range.1 - range.0;
    let step = rng.gen_range(-0.05..=0.05) * span;
    (current + step).clamp(range.0, range.1)
}

impl VmManager {
    /// Apply one resource-update tick to every started VM in place.
    pub fn tick_resources(&self) {
        let mut vms = self.vms.lock();
        for vm in vms.values_mut().filter(|vm| vm.state == VmState::Started) {
            walk_resources(vm);
        }
    }
}

#[cfg(test)]
#[path = "vm_manager_tests.rs"]
mod tests;
