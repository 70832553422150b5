// SPDX-License-Identifier: MIT

//! The job orchestrator: turns a service's desired state into jobs,
//! hands jobs to agents that claim them, and applies the resulting state
//! transition when a job finishes.

use crate::actions::{compute_action, completion_state, in_flight_state};
use fulcrum_core::{
    AgentId, Clock, CoreError, CoreResult, Job, JobAction, JobId, JobState, Service, ServiceId,
    ServiceState,
};
use fulcrum_store::{Repository, Store};
use std::time::Duration;

pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(300);

pub struct Orchestrator<'s, C> {
    store: &'s Store,
    clock: C,
    job_timeout: Duration,
}

impl<'s, C: Clock> Orchestrator<'s, C> {
    pub fn new(store: &'s Store, clock: C) -> Self {
        Self { store, clock, job_timeout: DEFAULT_JOB_TIMEOUT }
    }

    pub fn with_job_timeout(mut self, job_timeout: Duration) -> Self {
        self.job_timeout = job_timeout;
        self
    }

    /// The `(none) -> Created` row of the desired-state table: there is no
    /// prior stable state to reconcile from, so creation gets its own
    /// entry point rather than going through `reconcile`, which only ever
    /// acts on a service already on file.
    pub async fn create_service(&self, mut service: Service, target_properties: Option<serde_json::Value>) -> CoreResult<(Service, Job)> {
        let _guard = self.store.write_guard();
        let now = self.clock.now();

        service.state = ServiceState::Creating;
        service.target_state = Some(ServiceState::Created);
        service.target_properties = target_properties;
        service.updated_at = now;
        let service = self.store.services.create(service).await?;

        let mut job = Job::new(JobAction::ServiceCreate, service.id, 0, now);
        job.resources = service.target_properties.clone();
        let job = self.store.jobs.create(job).await?;
        Ok((service, job))
    }

    /// Pending jobs for services owned by `agent_id`, ordered
    /// `(priority DESC, createdAt ASC, id ASC)`. A pure read: unlike
    /// `claim_next_job`, nothing here is claimed or mutated.
    pub async fn pending_jobs_for_agent(&self, agent_id: &AgentId) -> CoreResult<Vec<Job>> {
        let mut jobs = Vec::new();
        for job in self.store.jobs.all() {
            if job.state != JobState::Pending {
                continue;
            }
            let service = self.store.services.get(&job.service_id).await?;
            if &service.agent_id == agent_id {
                jobs.push(job);
            }
        }
        jobs.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)).then(a.id.cmp(&b.id)));
        Ok(jobs)
    }

    /// Re-evaluate a service against the desired-state table and enqueue
    /// the resulting job, if any. Safe to call repeatedly — a service
    /// already in a transient state or already at its target is a no-op.
    pub async fn reconcile(&self, service_id: &ServiceId) -> CoreResult<Option<Job>> {
        let _guard = self.store.write_guard();
        let mut service = self.store.services.get(service_id).await?;
        let service_type = self.store.service_types.get(&service.service_type_id).await?;

        let Some(action) = compute_action(&service, &service_type) else {
            return Ok(None);
        };

        let now = self.clock.now();
        let mut job = Job::new(action, service.id, 0, now);
        job.resources = service.target_properties.clone();
        service.state = in_flight_state(action);
        service.touch(now);

        self.store.services.save(service).await?;
        let job = self.store.jobs.create(job).await?;
        Ok(Some(job))
    }

    /// `Retry(serviceId)`, permitted only when the service is `Failed`:
    /// clears the error and re-issues the action that failed as a fresh
    /// job, taking the service back into that action's transient state. A
    /// no-op — the service is returned unchanged — on anything that isn't
    /// currently `Failed`.
    pub async fn retry(&self, service_id: &ServiceId) -> CoreResult<Service> {
        let _guard = self.store.write_guard();
        let mut service = self.store.services.get(service_id).await?;
        if service.state != ServiceState::Failed {
            return Ok(service);
        }

        let action = self.last_failed_action(service_id).await?;
        let now = self.clock.now();

        service.error_message = None;
        service.state = in_flight_state(action);
        service.touch(now);
        let service = self.store.services.save(service).await?;

        let mut job = Job::new(action, service.id, 0, now);
        job.resources = service.target_properties.clone();
        self.store.jobs.create(job).await?;
        Ok(service)
    }

    /// The action of the most recent `Failed` job against `service_id`,
    /// which `retry` re-issues. A `Failed` service always has one, since
    /// only a failed job's `transition_job` call puts it there.
    async fn last_failed_action(&self, service_id: &ServiceId) -> CoreResult<JobAction> {
        self.store
            .jobs
            .all()
            .into_iter()
            .filter(|j| &j.service_id == service_id && j.state == JobState::Failed)
            .max_by_key(|j| j.completed_at.unwrap_or(j.updated_at))
            .map(|j| j.action)
            .ok_or_else(|| CoreError::internal(format!("service {service_id} is failed but has no failed job on record")))
    }

    /// The oldest pending job whose service belongs to `agent_id`, claimed
    /// atomically so two concurrent polls never hand out the same job.
    pub async fn claim_next_job(&self, agent_id: &AgentId) -> CoreResult<Option<Job>> {
        let _guard = self.store.write_guard();

        let mut candidates: Vec<Job> = self
            .store
            .jobs
            .all()
            .into_iter()
            .filter(|j| j.state == JobState::Pending)
            .collect();
        candidates.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)));

        for job in candidates {
            let service = self.store.services.get(&job.service_id).await?;
            if &service.agent_id != agent_id {
                continue;
            }

            let mut claimed = job;
            claimed.state = JobState::Processing;
            claimed.claimed_by = Some(agent_id.clone());
            claimed.claimed_at = Some(self.clock.now());
            claimed.updated_at = self.clock.now();
            let claimed = self.store.jobs.save(claimed).await?;
            return Ok(Some(claimed));
        }
        Ok(None)
    }

    /// Claim a specific job by id, as named in `GetPendingJobs`'s response.
    /// The job must be `Pending` and belong to a service owned by
    /// `agent_id`; a racing second claim on the same job returns
    /// `Conflict` rather than succeeding idempotently, so exactly one of
    /// two concurrent callers ever wins.
    pub async fn claim_job(&self, job_id: &JobId, agent_id: &AgentId) -> CoreResult<Job> {
        let _guard = self.store.write_guard();
        let mut job = self.store.jobs.get(job_id).await?;
        if job.state != JobState::Pending {
            return Err(CoreError::conflict(format!("job {job_id} is not pending")));
        }

        let service = self.store.services.get(&job.service_id).await?;
        if &service.agent_id != agent_id {
            return Err(CoreError::unauthorized("job does not belong to this agent"));
        }

        let now = self.clock.now();
        job.state = JobState::Processing;
        job.claimed_by = Some(agent_id.clone());
        job.claimed_at = Some(now);
        job.updated_at = now;
        self.store.jobs.save(job).await
    }

    /// Mark a job complete, store the agent-reported `resources` payload,
    /// and advance its service to the resulting state.
    pub async fn complete_job(&self, job_id: &JobId, agent_id: &AgentId, resources: Option<serde_json::Value>) -> CoreResult<Job> {
        let _guard = self.store.write_guard();
        let mut job = self.authorize_claim(job_id, agent_id).await?;
        job.resources = resources;
        self.transition_job(job, JobState::Completed, None).await
    }

    pub async fn fail_job(&self, job_id: &JobId, agent_id: &AgentId, error_message: impl Into<String>) -> CoreResult<Job> {
        let _guard = self.store.write_guard();
        let job = self.authorize_claim(job_id, agent_id).await?;
        self.transition_job(job, JobState::Failed, Some(error_message.into())).await
    }

    async fn authorize_claim(&self, job_id: &JobId, agent_id: &AgentId) -> CoreResult<Job> {
        let job = self.store.jobs.get(job_id).await?;
        if job.state != JobState::Processing {
            return Err(CoreError::conflict(format!("job {job_id} is not processing")));
        }
        if job.claimed_by.as_ref() != Some(agent_id) {
            return Err(CoreError::unauthorized("job is claimed by a different agent"));
        }
        Ok(job)
    }

    async fn transition_job(&self, mut job: Job, next: JobState, error_message: Option<String>) -> CoreResult<Job> {
        if !job.state.can_transition_to(next) {
            return Err(CoreError::conflict(format!("{} cannot transition to {next}", job.state)));
        }

        let now = self.clock.now();
        job.state = next;
        job.completed_at = Some(now);
        job.error_message = error_message.clone();
        job.updated_at = now;
        let job = self.store.jobs.save(job).await?;

        let mut service = self.store.services.get(&job.service_id).await?;
        match next {
            JobState::Completed => {
                service.state = completion_state(job.action);
                if service.state == ServiceState::Started {
                    service.current_properties = service.target_properties.clone();
                }
                if service.target_state == Some(service.state) {
                    service.target_state = None;
                }
                service.retry_count = 0;
                service.error_message = None;
            }
            JobState::Failed => {
                service.retry_count += 1;
                service.error_message = error_message;
                service.state = ServiceState::Failed;
            }
            _ => unreachable!("transition_job only called with Completed or Failed"),
        }
        service.touch(now);
        self.store.services.save(service).await?;

        Ok(job)
    }

    /// Fail every `Processing` job whose `job_timeout` has elapsed, as
    /// though the claiming agent had reported a failure itself.
    pub async fn sweep_timeouts(&self) -> CoreResult<Vec<JobId>> {
        let _guard = self.store.write_guard();
        let now = self.clock.now();
        let timed_out: Vec<Job> = self
            .store
            .jobs
            .all()
            .into_iter()
            .filter(|j| j.is_timed_out(now, self.job_timeout))
            .collect();

        let mut swept = Vec::new();
        for job in timed_out {
            let job_id = job.id;
            self.transition_job(job, JobState::Failed, Some("job timed out".into())).await?;
            swept.push(job_id);
        }
        Ok(swept)
    }

    /// Delete terminal jobs older than `retention` so the job table
    /// doesn't grow without bound.
    pub async fn sweep_old_jobs(&self, retention: Duration) -> CoreResult<usize> {
        let _guard = self.store.write_guard();
        let now = self.clock.now();
        let cutoff = chrono::Duration::from_std(retention).unwrap_or_default();

        let stale: Vec<JobId> = self
            .store
            .jobs
            .all()
            .into_iter()
            .filter(|j| j.state.is_terminal())
            .filter(|j| j.completed_at.is_some_and(|at| now - at > cutoff))
            .map(|j| j.id)
            .collect();

        let count = stale.len();
        for id in stale {
            self.store.jobs.delete(&id).await?;
        }
        Ok(count)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
