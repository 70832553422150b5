// SPDX-License-Identifier: MIT

//! The five (six, counting `Internal`) error kinds shared by every component.
//!
//! Every fallible core operation returns `Result<T, CoreError>`. Wire-layer
//! code maps these to HTTP statuses once, at the boundary; internal messages
//! never carry credentials or hashes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable kind tag, useful for wire-layer status mapping and tests.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unauthenticated(_) => ErrorKind::Unauthenticated,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    Unauthenticated,
    Unauthorized,
    Internal,
}

crate::simple_display! {
    ErrorKind {
        InvalidInput => "invalid_input",
        NotFound => "not_found",
        Conflict => "conflict",
        Unauthenticated => "unauthenticated",
        Unauthorized => "unauthorized",
        Internal => "internal",
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Truncate an error message to a reasonable wire-safe bound.
pub const ERROR_MESSAGE_MAX_LEN: usize = 1024;

pub fn truncate_error_message(msg: &str) -> String {
    if msg.chars().count() <= ERROR_MESSAGE_MAX_LEN {
        msg.to_string()
    } else {
        let truncated: String = msg.chars().take(ERROR_MESSAGE_MAX_LEN).collect();
        format!("{truncated}…")
    }
}
