// SPDX-License-Identifier: MIT

//! Bearer-authenticated HTTP client for the control plane's wire API.
//!
//! Field names on the wire use the same snake_case convention as the
//! shared [`fulcrum_core`] types, since both ends of this link are
//! implemented in this workspace — there's no cross-language client to
//! accommodate a different wire casing for.

use crate::error::{AgentError, AgentResult};
use fulcrum_core::{Agent, AgentStatus, Job, JobId, MetricEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct FulcrumClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct StatusUpdateBody {
    state: AgentStatus,
}

#[derive(Serialize)]
struct FailJobBody<'a> {
    error_message: &'a str,
}

#[derive(Deserialize)]
struct EmptyBody {}

impl FulcrumClient {
    pub fn new(base_url: impl Into<String>, token: impl AsRef<str>) -> AgentResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let auth = format!("Bearer {}", token.as_ref());
        let mut value = reqwest::header::HeaderValue::from_str(&auth)
            .map_err(|e| AgentError::InvalidInput(format!("invalid agent token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::InvalidInput(format!("failed to build http client: {e}")))?;

        Ok(Self { http, base_url: base_url.into() })
    }

    /// `GetAgentInfo`: validates the token, returns the agent record.
    pub async fn get_agent_info(&self) -> AgentResult<Agent> {
        self.get("/api/v1/agents/me").await
    }

    pub async fn update_status(&self, state: AgentStatus) -> AgentResult<()> {
        self.put_no_content("/api/v1/agents/me/status", &StatusUpdateBody { state }).await
    }

    pub async fn get_pending_jobs(&self) -> AgentResult<Vec<Job>> {
        self.get("/api/v1/jobs/pending").await
    }

    pub async fn claim_job(&self, id: &JobId) -> AgentResult<()> {
        self.post_no_content(&format!("/api/v1/jobs/{id}/claim"), &EmptyBody {}).await
    }

    pub async fn complete_job(&self, id: &JobId, result: serde_json::Value) -> AgentResult<()> {
        self.post_no_content(&format!("/api/v1/jobs/{id}/complete"), &result).await
    }

    pub async fn fail_job(&self, id: &JobId, error_message: &str) -> AgentResult<()> {
        self.post_no_content(&format!("/api/v1/jobs/{id}/fail"), &FailJobBody { error_message }).await
    }

    pub async fn submit_metric(&self, entry: &MetricEntry) -> AgentResult<()> {
        self.post_no_content("/api/v1/metric-entries", entry).await
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> AgentResult<T> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| AgentError::Transport { path: path.into(), source: e })?;
        Self::decode(path, response).await
    }

    async fn put_no_content(&self, path: &str, body: &impl Serialize) -> AgentResult<()> {
        let response = self
            .http
            .put(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::Transport { path: path.into(), source: e })?;
        Self::check_status(path, response).await
    }

    async fn post_no_content(&self, path: &str, body: &impl Serialize) -> AgentResult<()> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::Transport { path: path.into(), source: e })?;
        Self::check_status(path, response).await
    }

    async fn check_status(path: &str, response: reqwest::Response) -> AgentResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::Status { path: path.into(), status: status.as_u16(), body })
    }

    async fn decode<T: for<'de> Deserialize<'de>>(path: &str, response: reqwest::Response) -> AgentResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status { path: path.into(), status: status.as_u16(), body });
        }
        response
            .json()
            .await
            .map_err(|e| AgentError::Transport { path: path.into(), source: e })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
