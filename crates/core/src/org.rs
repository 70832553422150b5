// SPDX-License-Identifier: MIT

//! Organizational entities: Provider, Participant, Broker.
//!
//! All three share the same shape (name, optional country, free-form
//! attributes) so they're modeled as one generic record parameterized by a
//! marker id type, matching how the reference treats them as siblings in
//! the same ownership graph.

use crate::attributes::{validate_country_code, Attributes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifies a Provider — an organization whose agents realize services.
    pub struct ProviderId;
}

crate::define_id! {
    /// Identifies a Participant — the identity-bearing counterpart of a Provider.
    pub struct ParticipantId;
}

crate::define_id! {
    /// Identifies a Broker — a consumer-facing organization owning service groups.
    pub struct BrokerId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub name: String,
    pub country_code: Option<String>,
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub country_code: Option<String>,
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broker {
    pub id: BrokerId,
    pub name: String,
    pub country_code: Option<String>,
    pub attributes: Attributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shared validation for the three organizational entities: non-empty name,
/// well-formed country code if present.
pub fn validate_org_fields(name: &str, country_code: Option<&str>) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name must not be empty".into());
    }
    if let Some(code) = country_code {
        validate_country_code(code)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "org_tests.rs"]
mod tests;
