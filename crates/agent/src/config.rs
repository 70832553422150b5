// SPDX-License-Identifier: MIT

//! Agent configuration: a JSON file (selected with `-config <path>`)
//! overlaid with `TESTAGENT_`-prefixed environment variables. Durations
//! use the standard `<number><unit>` form (`s`, `m`, `h`, ...) via
//! [`humantime`]. Invalid values fail fast with the offending field named.

use crate::error::{AgentError, AgentResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_VM_OPERATION_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_JOB_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_METRIC_REPORT_INTERVAL: Duration = Duration::from_secs(15);
const DEFAULT_OPERATION_DELAY_MIN: Duration = Duration::from_millis(500);
const DEFAULT_OPERATION_DELAY_MAX: Duration = Duration::from_millis(2000);
const DEFAULT_ERROR_RATE: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_url: String,
    pub agent_token: String,
    pub vm_operation_interval: Duration,
    pub job_poll_interval: Duration,
    pub metric_report_interval: Duration,
    pub operation_delay_min: Duration,
    pub operation_delay_max: Duration,
    pub error_rate: f64,
}

/// On-disk shape; every field optional so a partial file layers over the
/// built-in defaults, which in turn are overridden by environment
/// variables in [`AgentConfig::load`].
#[derive(Debug, Default, Deserialize)]
struct RawAgentConfig {
    api_url: Option<String>,
    agent_token: Option<String>,
    vm_operation_interval: Option<String>,
    job_poll_interval: Option<String>,
    metric_report_interval: Option<String>,
    operation_delay_min: Option<String>,
    operation_delay_max: Option<String>,
    error_rate: Option<f64>,
}

impl AgentConfig {
    /// Load defaults, then an optional JSON file, then `TESTAGENT_*`
    /// environment overrides, validating the merged result.
    pub fn load(config_path: Option<&Path>) -> AgentResult<Self> {
        let raw = match config_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| AgentError::InvalidConfig { field: "config".into(), message: e.to_string() })?;
                serde_json::from_str(&contents)
                    .map_err(|e| AgentError::InvalidConfig { field: "config".into(), message: e.to_string() })?
            }
            None => RawAgentConfig::default(),
        };

        let api_url = env_override("FULCRUM_API_URL").or(raw.api_url).unwrap_or_else(|| "http://localhost:8080".into());
        let agent_token = env_override("AGENT_TOKEN").or(raw.agent_token).unwrap_or_default();

        let vm_operation_interval = duration_field(
            "VM_OPERATION_INTERVAL",
            env_override("VM_OPERATION_INTERVAL").or(raw.vm_operation_interval),
            DEFAULT_VM_OPERATION_INTERVAL,
        )?;
        let job_poll_interval = duration_field(
            "JOB_POLL_INTERVAL",
            env_override("JOB_POLL_INTERVAL").or(raw.job_poll_interval),
            DEFAULT_JOB_POLL_INTERVAL,
        )?;
        let metric_report_interval = duration_field(
            "METRIC_REPORT_INTERVAL",
            env_override("METRIC_REPORT_INTERVAL").or(raw.metric_report_interval),
            DEFAULT_METRIC_REPORT_INTERVAL,
        )?;
        let operation_delay_min = duration_field(
            "OPERATION_DELAY_MIN",
            env_override("OPERATION_DELAY_MIN").or(raw.operation_delay_min),
            DEFAULT_OPERATION_DELAY_MIN,
        )?;
        let operation_delay_max = duration_field(
            "OPERATION_DELAY_MAX",
            env_override("OPERATION_DELAY_MAX").or(raw.operation_delay_max),
            DEFAULT_OPERATION_DELAY_MAX,
        )?;

        let error_rate = match env_override("ERROR_RATE") {
            Some(s) => s
                .parse::<f64>()
                .map_err(|e| AgentError::InvalidConfig { field: "ERROR_RATE".into(), message: e.to_string() })?,
            None => raw.error_rate.unwrap_or(DEFAULT_ERROR_RATE),
        };

        let config = Self {
            api_url,
            agent_token,
            vm_operation_interval,
            job_poll_interval,
            metric_report_interval,
            operation_delay_min,
            operation_delay_max,
            error_rate,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AgentResult<()> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(AgentError::InvalidConfig {
                field: "ERROR_RATE".into(),
                message: format!("must be in [0, 1], got {}", self.error_rate),
            });
        }
        if self.operation_delay_min > self.operation_delay_max {
            return Err(AgentError::InvalidConfig {
                field: "OPERATION_DELAY_MIN".into(),
                message: "must be <= OPERATION_DELAY_MAX".into(),
            });
        }
        if self.agent_token.is_empty() {
            return Err(AgentError::InvalidConfig { field: "AGENT_TOKEN".into(), message: "must not be empty".into() });
        }
        Ok(())
    }
}

fn env_override(suffix: &str) -> Option<String> {
    std::env::var(format!("TESTAGENT_{suffix}")).ok()
}

fn duration_field(field: &str, value: Option<String>, default: Duration) -> AgentResult<Duration> {
    match value {
        Some(s) => humantime::parse_duration(&s)
            .map_err(|e| AgentError::InvalidConfig { field: field.into(), message: e.to_string() }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
