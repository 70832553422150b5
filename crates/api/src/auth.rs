// SPDX-License-Identifier: MIT

//! Resolves the bearer token on every request into an `Identity`, so
//! handlers never touch the `Authorization` header directly.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fulcrum_authz::{Authenticator, TokenAuthenticator};
use fulcrum_core::{CoreError, Identity, SystemClock};
use fulcrum_store::TokenRepository;

pub struct AuthenticatedIdentity(pub Identity);

impl FromRequestParts<AppState> for AuthenticatedIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CoreError::unauthenticated("missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| CoreError::unauthenticated("Authorization header is not a bearer token"))?;

        let lookup = TokenRepository::new(&state.store.tokens);
        let authenticator = TokenAuthenticator::new(lookup, SystemClock);
        let identity = authenticator.authenticate(token).await?;
        Ok(Self(identity))
    }
}
