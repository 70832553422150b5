// SPDX-License-Identifier: MIT

//! The agent lifecycle: four independently-timed loops (heartbeat,
//! resource update, metrics report, job poll) launched from `Start` and
//! joined under a capped `Shutdown`.

use crate::client::FulcrumClient;
use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};
use crate::metrics::{self, MetricBuffer};
use crate::vm_manager::VmManager;
use fulcrum_core::{AgentStatus, Job, JobAction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const SHUTDOWN_CAP: Duration = Duration::from_secs(30);
const HEARTBEAT_INTERVAL: Duration = crate::config::DEFAULT_HEARTBEAT_INTERVAL;
const DEFAULT_CPU: u32 = 2;
const DEFAULT_MEMORY: u32 = 1;

/// Per-tick counters the job-poll loop accumulates; surfaced for tests
/// and for an operator inspecting a running agent.
#[derive(Default)]
pub struct JobCounters {
    pub processed: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
}

pub struct AgentRuntime {
    client: Arc<FulcrumClient>,
    config: AgentConfig,
    vm_manager: Arc<VmManager>,
    metrics: Arc<MetricBuffer>,
    counters: Arc<JobCounters>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl AgentRuntime {
    pub fn new(config: AgentConfig) -> AgentResult<Self> {
        let client = FulcrumClient::new(config.api_url.clone(), &config.agent_token)?;
        let vm_manager = VmManager::new(config.operation_delay_min, config.operation_delay_max, config.error_rate);
        Ok(Self {
            client: Arc::new(client),
            config,
            vm_manager: Arc::new(vm_manager),
            metrics: Arc::new(MetricBuffer::new(1024)),
            counters: Arc::new(JobCounters::default()),
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        })
    }

    pub fn counters(&self) -> Arc<JobCounters> {
        Arc::clone(&self.counters)
    }

    /// Validate the token against the control plane, transition to
    /// `Connected`, and launch the four loops.
    pub async fn start(&mut self) -> AgentResult<()> {
        let agent = self.client.get_agent_info().await?;
        self.metrics.set_agent_id(agent.id);
        self.client.update_status(AgentStatus::Connected).await?;
        info!(agent_id = %agent.id, "agent connected");

        self.tasks.push(spawn_heartbeat_loop(Arc::clone(&self.client), self.cancel.clone()));
        self.tasks.push(spawn_resource_update_loop(
            Arc::clone(&self.vm_manager),
            Arc::clone(&self.metrics),
            self.config.vm_operation_interval,
            self.cancel.clone(),
        ));
        self.tasks.push(spawn_metrics_report_loop(
            Arc::clone(&self.metrics),
            Arc::clone(&self.client),
            self.config.metric_report_interval,
            self.cancel.clone(),
        ));
        self.tasks.push(spawn_job_poll_loop(
            Arc::clone(&self.client),
            Arc::clone(&self.vm_manager),
            Arc::clone(&self.metrics),
            Arc::clone(&self.counters),
            self.config.job_poll_interval,
            self.cancel.clone(),
        ));

        Ok(())
    }

    /// Signal every loop, wait up to the shutdown cap for them to finish,
    /// then report `Disconnected`. A loop that doesn't join in time turns
    /// into a `ShutdownTimeout` error rather than blocking forever.
    pub async fn shutdown(mut self) -> AgentResult<()> {
        self.cancel.cancel();

        let join_all = async {
            for task in self.tasks.drain(..) {
                let _ = task.await;
            }
        };

        if tokio::time::timeout(SHUTDOWN_CAP, join_all).await.is_err() {
            return Err(AgentError::ShutdownTimeout(format!("loops did not stop within {SHUTDOWN_CAP:?}")));
        }

        self.client.update_status(AgentStatus::Disconnected).await?;
        Ok(())
    }
}

fn spawn_heartbeat_loop(client: Arc<FulcrumClient>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = client.update_status(AgentStatus::Connected).await {
                        warn!(error = %e, "heartbeat failed");
                    }
                }
            }
        }
    })
}

fn spawn_resource_update_loop(
    vm_manager: Arc<VmManager>,
    metrics: Arc<MetricBuffer>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    vm_manager.tick_resources();
                    let now = chrono::Utc::now();
                    for vm in vm_manager.started_vms() {
                        metrics.record_vm_resource_usage(&vm, now);
                    }
                }
            }
        }
    })
}

fn spawn_metrics_report_loop(
    metrics: Arc<MetricBuffer>,
    client: Arc<FulcrumClient>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    match metrics::report_once(&metrics, &client).await {
                        Ok(count) => debug!(count, "reported metrics"),
                        Err(e) => warn!(error = %e, "metrics report failed"),
                    }
                }
            }
        }
    })
}

fn spawn_job_poll_loop(
    client: Arc<FulcrumClient>,
    vm_manager: Arc<VmManager>,
    metrics: Arc<MetricBuffer>,
    counters: Arc<JobCounters>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(e) = process_one_tick(&client, &vm_manager, &metrics, &counters).await {
                        warn!(error = %e, "job poll tick failed");
                    }
                }
            }
        }
    })
}

/// One job-poll tick: at most one job is claimed and executed. The
/// server is authoritative on ordering — the agent takes the first entry
/// of the pending-jobs response as-is.
async fn process_one_tick(
    client: &FulcrumClient,
    vm_manager: &VmManager,
    metrics: &MetricBuffer,
    counters: &JobCounters,
) -> AgentResult<()> {
    let pending = client.get_pending_jobs().await?;
    let Some(job) = pending.into_iter().next() else {
        return Ok(());
    };

    counters.processed.fetch_add(1, Ordering::Relaxed);

    if let Err(e) = client.claim_job(&job.id).await {
        counters.failed.fetch_add(1, Ordering::Relaxed);
        return Err(e);
    }

    let now = chrono::Utc::now();
    let result = dispatch(vm_manager, &job).await;
    let duration = (chrono::Utc::now() - now).to_std().unwrap_or_default();
    metrics.record_vm_operation_duration(job.service_id, job.action.to_string().as_str(), duration, now);

    match result {
        Ok(()) => {
            client.complete_job(&job.id, serde_json::json!({ "ts": now })).await?;
            counters.succeeded.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            metrics.record_vm_operation_failure(job.service_id, job.action.to_string().as_str(), now);
            client.fail_job(&job.id, &e.to_string()).await?;
            counters.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    Ok(())
}

async fn dispatch(vm_manager: &VmManager, job: &Job) -> AgentResult<()> {
    match job.action {
        JobAction::ServiceCreate => {
            let (cpu, memory) = parse_resources(job.resources.as_ref())?;
            vm_manager.create_vm(job.service_id, job.service_id.to_string(), cpu, memory).await
        }
        JobAction::ServiceStart => vm_manager.start_vm(job.service_id).await,
        JobAction::ServiceStop => vm_manager.stop_vm(job.service_id).await,
        JobAction::ServiceHotUpdate | JobAction::ServiceColdUpdate => {
            let (cpu, memory) = parse_resources(job.resources.as_ref())?;
            vm_manager.update_vm(job.service_id, job.service_id.to_string(), cpu, memory).await
        }
        JobAction::ServiceDelete => vm_manager.delete_vm(job.service_id).await,
    }
}

/// `cpu`/`memory` are parsed from the job's resources object, defaulting
/// to `(2, 1)` when absent; a present-but-malformed field is a named
/// validation error rather than a silent default.
fn parse_resources(resources: Option<&serde_json::Value>) -> AgentResult<(u32, u32)> {
    let cpu = parse_field(resources, "cpu", DEFAULT_CPU)?;
    let memory = parse_field(resources, "memory", DEFAULT_MEMORY)?;
    Ok((cpu, memory))
}

fn parse_field(resources: Option<&serde_json::Value>, field: &str, default: u32) -> AgentResult<u32> {
    let Some(value) = resources.and_then(|r| r.get(field)) else {
        return Ok(default);
    };
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| AgentError::InvalidInput(format!("invalid {field} value")))
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
