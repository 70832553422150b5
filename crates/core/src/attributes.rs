// SPDX-License-Identifier: MIT

//! Free-form attribute bag: a map from string key to an ordered sequence of
//! string values. Used by `Provider`/`Participant`/`Broker` and serialized
//! identically on the wire (a JSON object whose values are string arrays).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(pub IndexMap<String, Vec<String>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(|v| v.as_slice())
    }

    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), values);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A two-uppercase-letter ISO-3166-ish country code, validated at the
/// boundary; an invalid country code is always an `InvalidInput`.
pub fn validate_country_code(code: &str) -> Result<(), String> {
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(format!("invalid country code: {code:?} (expected two uppercase letters)"))
    }
}

#[cfg(test)]
#[path = "attributes_tests.rs"]
mod tests;
