// SPDX-License-Identifier: MIT

//! fulcrum-store: in-memory entity storage. Provides a generic
//! repository over every entity kind, an append-only audit log, a metric
//! sample log, and the adapters that let `fulcrum-authz` resolve tokens
//! and agent ownership without depending on this crate directly.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod agent_provider;
pub mod audit_log;
pub mod entity;
pub mod metric_log;
pub mod repository;
pub mod store;
pub mod token_repository;

pub use agent_provider::AgentProviderRepository;
pub use audit_log::AuditLog;
pub use entity::Entity;
pub use metric_log::MetricLog;
pub use repository::{InMemoryRepository, Repository};
pub use store::Store;
pub use token_repository::TokenRepository;
