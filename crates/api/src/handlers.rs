// SPDX-License-Identifier: MIT

//! The wire-protocol endpoints the agent runtime and the control-plane's
//! own callers speak over: self-info, status, pending jobs,
//! claim/complete/fail, metric submission, and service retry.

use crate::auth::AuthenticatedIdentity;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fulcrum_authz::{Action, Authorizer, DefaultAuthorizer, ObjectType};
use fulcrum_core::{
    Agent, AgentId, AgentStatus, AuditEntry, AuthorityType, Clock, CoreError, CoreResult,
    DefaultScopeTarget, EventType, Identity, Job, JobId, MetricEntry, ObjectScope, Role, Service,
    ServiceId, SystemClock,
};
use fulcrum_store::{AgentProviderRepository, Repository};
use serde::{Deserialize, Serialize};

/// The identity's own agent id, as carried by its token scope. Only an
/// `agent`-role identity has one; anything else can't call these
/// endpoints at all.
fn self_agent_id(identity: &Identity) -> CoreResult<AgentId> {
    let raw = identity
        .scope
        .agent_id
        .as_deref()
        .ok_or_else(|| CoreError::unauthorized("identity does not carry an agent scope"))?;
    AgentId::parse(raw).map_err(|e| CoreError::internal(format!("malformed agent id in token scope: {e}")))
}

fn self_scope(agent_id: &AgentId) -> ObjectScope {
    ObjectScope::default_scope(DefaultScopeTarget { agent_id: Some(agent_id.to_string()), ..Default::default() })
}

async fn authorize(state: &AppState, identity: &Identity, action: Action, object: ObjectType, scope: &ObjectScope) -> CoreResult<()> {
    let lookup = AgentProviderRepository::new(&state.store.agents);
    DefaultAuthorizer::new(lookup).authorize(identity, action, object, scope).await
}

fn authority_type(role: Role) -> AuthorityType {
    match role {
        Role::Admin => AuthorityType::Admin,
        Role::Participant => AuthorityType::Participant,
        Role::Agent => AuthorityType::Agent,
    }
}

fn append_audit(state: &AppState, identity: &Identity, event_type: EventType, entity_id: impl Into<String>, diff: serde_json::Value) {
    let _guard = state.store.write_guard();
    state.store.audit_log.append(AuditEntry::new(
        authority_type(identity.role),
        identity.id,
        event_type,
        entity_id,
        diff,
        SystemClock.now(),
    ));
}

pub async fn get_agent_info(State(state): State<AppState>, AuthenticatedIdentity(identity): AuthenticatedIdentity) -> Result<Json<Agent>, ApiError> {
    let agent_id = self_agent_id(&identity)?;
    authorize(&state, &identity, Action::Read, ObjectType::Agent, &self_scope(&agent_id)).await?;
    let agent = state.store.agents.get(&agent_id).await?;
    Ok(Json(agent))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub state: AgentStatus,
}

pub async fn update_agent_status(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Agent>, ApiError> {
    let agent_id = self_agent_id(&identity)?;
    authorize(&state, &identity, Action::UpdateStatus, ObjectType::Agent, &self_scope(&agent_id)).await?;

    let mut agent = state.store.agents.get(&agent_id).await?;
    agent.set_status(body.state, SystemClock.now());
    let agent = state.store.agents.save(agent).await?;

    append_audit(&state, &identity, EventType::StatusChanged, agent.id.to_string(), serde_json::json!({ "status": agent.status }));
    Ok(Json(agent))
}

pub async fn get_pending_jobs(State(state): State<AppState>, AuthenticatedIdentity(identity): AuthenticatedIdentity) -> Result<Json<Vec<Job>>, ApiError> {
    let agent_id = self_agent_id(&identity)?;
    authorize(&state, &identity, Action::ListPending, ObjectType::Job, &ObjectScope::always()).await?;

    let jobs = state.orchestrator().pending_jobs_for_agent(&agent_id).await?;
    Ok(Json(jobs))
}

fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    JobId::parse(raw).map_err(|e| CoreError::invalid_input(format!("malformed job id: {e}")).into())
}

pub async fn claim_job(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let agent_id = self_agent_id(&identity)?;
    let job_id = parse_job_id(&job_id)?;
    authorize(&state, &identity, Action::Claim, ObjectType::Job, &ObjectScope::always()).await?;

    let job = state.orchestrator().claim_job(&job_id, &agent_id).await?;
    Ok(Json(job))
}

pub async fn complete_job(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(job_id): Path<String>,
    Json(resources): Json<serde_json::Value>,
) -> Result<Json<Job>, ApiError> {
    let agent_id = self_agent_id(&identity)?;
    let job_id = parse_job_id(&job_id)?;
    authorize(&state, &identity, Action::Complete, ObjectType::Job, &ObjectScope::always()).await?;

    let resources = (!resources.is_null()).then_some(resources);
    let job = state.orchestrator().complete_job(&job_id, &agent_id, resources).await?;
    append_audit(&state, &identity, EventType::Updated, job.id.to_string(), serde_json::json!({ "jobState": job.state, "action": job.action }));
    Ok(Json(job))
}

#[derive(Debug, Deserialize)]
pub struct FailJobRequest {
    pub error_message: String,
}

pub async fn fail_job(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(job_id): Path<String>,
    Json(body): Json<FailJobRequest>,
) -> Result<Json<Job>, ApiError> {
    let agent_id = self_agent_id(&identity)?;
    let job_id = parse_job_id(&job_id)?;
    authorize(&state, &identity, Action::Fail, ObjectType::Job, &ObjectScope::always()).await?;

    let job = state.orchestrator().fail_job(&job_id, &agent_id, body.error_message).await?;
    append_audit(&state, &identity, EventType::Updated, job.id.to_string(), serde_json::json!({ "jobState": job.state, "errorMessage": job.error_message }));
    Ok(Json(job))
}

fn parse_service_id(raw: &str) -> Result<ServiceId, ApiError> {
    ServiceId::parse(raw).map_err(|e| CoreError::invalid_input(format!("malformed service id: {e}")).into())
}

pub async fn retry_service(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Path(service_id): Path<String>,
) -> Result<Json<Service>, ApiError> {
    let service_id = parse_service_id(&service_id)?;
    let existing = state.store.services.get(&service_id).await?;
    let scope = ObjectScope::default_scope(DefaultScopeTarget { agent_id: Some(existing.agent_id.to_string()), ..Default::default() });
    authorize(&state, &identity, Action::Retry, ObjectType::Service, &scope).await?;

    let service = state.orchestrator().retry(&service_id).await?;
    append_audit(&state, &identity, EventType::Updated, service.id.to_string(), serde_json::json!({ "serviceState": service.state }));
    Ok(Json(service))
}

#[derive(Debug, Deserialize)]
pub struct MetricEntryRequest {
    pub type_name: String,
    pub service_id: Option<String>,
    pub external_id: Option<String>,
    pub resource_id: Option<String>,
    pub value: f64,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MetricEntryResponse {
    pub accepted: bool,
}

pub async fn submit_metric_entry(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity): AuthenticatedIdentity,
    Json(body): Json<MetricEntryRequest>,
) -> Result<(StatusCode, Json<MetricEntryResponse>), ApiError> {
    let agent_id = self_agent_id(&identity)?;
    authorize(&state, &identity, Action::Create, ObjectType::MetricEntry, &ObjectScope::always()).await?;

    let entry = MetricEntry {
        type_name: body.type_name,
        agent_id: Some(agent_id),
        service_id: body.service_id,
        external_id: body.external_id,
        resource_id: body.resource_id,
        value: body.value,
        timestamp: body.timestamp.unwrap_or_else(|| SystemClock.now()),
    };
    state.store.metric_log.append([entry]);

    Ok((StatusCode::CREATED, Json(MetricEntryResponse { accepted: true })))
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
