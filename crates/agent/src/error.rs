// SPDX-License-Identifier: MIT

//! Errors surfaced by the agent runtime: wire failures talking to the
//! control plane, and local VM-manager invariant violations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("request to {path} failed: {source}")]
    Transport { path: String, #[source] source: reqwest::Error },

    #[error("control plane returned {status} for {path}: {body}")]
    Status { path: String, status: u16, body: String },

    #[error("invalid VM operation: {0}")]
    InvalidTransition(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("vm {0} not found")]
    VmNotFound(String),

    #[error("shutdown did not complete within the cap: {0}")]
    ShutdownTimeout(String),

    #[error("invalid configuration field {field}: {message}")]
    InvalidConfig { field: String, message: String },
}

pub type AgentResult<T> = Result<T, AgentError>;
