// SPDX-License-Identifier: MIT

//! Wires the store's token repository into `fulcrum-authz`'s
//! [`TokenLookup`] so the authenticator never has to know this crate
//! exists.

use crate::repository::InMemoryRepository;
use async_trait::async_trait;
use fulcrum_authz::TokenLookup;
use fulcrum_core::{CoreResult, Token};

pub struct TokenRepository<'a> {
    tokens: &'a InMemoryRepository<Token>,
}

impl<'a> TokenRepository<'a> {
    pub fn new(tokens: &'a InMemoryRepository<Token>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl TokenLookup for TokenRepository<'_> {
    async fn find_by_hash(&self, hashed_value: &str) -> CoreResult<Option<Token>> {
        // Linear scan: the token table is expected to stay small relative
        // to services/jobs, and lookups only happen once per request on
        // the authentication hot path, not per poll tick.
        Ok(self.tokens.all().into_iter().find(|t| t.hashed_value == hashed_value))
    }
}
