// SPDX-License-Identifier: MIT

//! fulcrum-authz: identity resolution (authentication) and the scoped
//! role x action x object x object-scope authorization engine.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod authenticator;
pub mod authorizer;
pub mod rules;
pub mod token_auth;

pub use authenticator::{Authenticator, CompositeAuthenticator};
pub use authorizer::{AgentProviderLookup, Authorizer, DefaultAuthorizer};
pub use rules::{Action, ObjectType};
pub use token_auth::{TokenAuthenticator, TokenLookup};
