// SPDX-License-Identifier: MIT

//! Bearer-token authentication.

use async_trait::async_trait;
use fulcrum_core::{CoreError, CoreResult, Identity};

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> CoreResult<Identity>;

    /// Aggregate health of whatever backs this authenticator (db ping, etc.).
    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// Tries a list of delegates in order; returns the first successful
/// identity. If every delegate fails, returns a single combined
/// authentication error rather than the delegates' individual errors.
pub struct CompositeAuthenticator {
    delegates: Vec<Box<dyn Authenticator>>,
}

impl CompositeAuthenticator {
    pub fn new(delegates: Vec<Box<dyn Authenticator>>) -> Self {
        Self { delegates }
    }
}

#[async_trait]
impl Authenticator for CompositeAuthenticator {
    async fn authenticate(&self, token: &str) -> CoreResult<Identity> {
        for delegate in &self.delegates {
            if let Ok(identity) = delegate.authenticate(token).await {
                return Ok(identity);
            }
        }
        Err(CoreError::unauthenticated(
            "no authenticator could resolve the supplied bearer token",
        ))
    }

    async fn health_check(&self) -> CoreResult<()> {
        let mut failures = Vec::new();
        for delegate in &self.delegates {
            if let Err(e) = delegate.health_check().await {
                failures.push(e.to_string());
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CoreError::internal(format!(
                "composite authenticator health check failed: {}",
                failures.join("; ")
            )))
        }
    }
}
