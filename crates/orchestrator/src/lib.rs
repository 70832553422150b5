// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fulcrum-orchestrator: translates service desired-state changes into
//! ordered jobs, enforces the job/service state machines, and recovers
//! stuck work via timeout and retention sweeps.

pub mod actions;
pub mod orchestrator;

pub use orchestrator::{Orchestrator, DEFAULT_JOB_TIMEOUT};
