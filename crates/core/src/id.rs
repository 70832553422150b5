// SPDX-License-Identifier: MIT

//! Opaque 128-bit entity identifiers.
//!
//! Every entity in the system is keyed by a random UUID wrapped in a
//! type-specific newtype, so a `ServiceId` and a `JobId` can never be
//! confused at the call site even though both are "just a uuid" on the wire.

use std::fmt;
use uuid::Uuid;

/// Define a newtype ID wrapper around [`uuid::Uuid`].
///
/// Generates `new()` for random generation, `from_uuid`/`parse` for
/// round-tripping, `Display`, `From<Uuid>`, and serde (de)serialization
/// as the bare UUID string (no type prefix on the wire — the type itself
/// carries that information).
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID (e.g. one read back from storage).
            pub fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            /// Parse from its canonical hyphenated string form.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }

            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(id: uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Ok(Self(uuid::Uuid::deserialize(deserializer)?))
            }
        }
    };
}

/// Returns a string slice truncated to at most `n` characters; used for
/// short, human-scannable log lines.
pub fn short(id: &impl fmt::Display, n: usize) -> String {
    let s = id.to_string();
    let end = s
        .char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].to_string()
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
