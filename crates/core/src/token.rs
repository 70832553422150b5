// SPDX-License-Identifier: MIT

//! Token: bearer credential. The raw value is only ever returned at
//! creation/regeneration time; afterwards only a salted hash is persisted.

use crate::identity::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

crate::define_id! {
    pub struct TokenId;
}

/// Fixed application-wide salt. A per-token random salt would be stronger,
/// but a fixed-salt SHA-256 digest is sufficient here since tokens are
/// already high-entropy random values, not user-chosen passwords.
const TOKEN_SALT: &str = "fulcrum-core-token-v1";

pub fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(TOKEN_SALT.as_bytes());
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Generate a new random raw token value (returned to the caller exactly once).
pub fn generate_raw_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub name: String,
    pub role: Role,
    pub hashed_value: String,
    pub expires_at: DateTime<Utc>,
    pub scope_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
