// SPDX-License-Identifier: MIT

//! Maps every `CoreError` kind to an HTTP status exactly once, at the
//! boundary. Internal messages never carry credentials or hashes, so the
//! body is always safe to return as-is.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fulcrum_core::{CoreError, ErrorKind};

pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}
