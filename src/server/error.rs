//! HTTP error mapping (§7), grounded on the teacher's `server::error::ApiError`
//! three-variant `IntoResponse` impl, widened to the full taxonomy spec.md
//! names (`Unauthenticated`, `Forbidden`, `InvalidState`, `InvalidAmount`,
//! `Conflict`, `StorageUnavailable`) instead of folding them all into
//! `BadRequest`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::engine::OrchestratorError;
use crate::registry::RegistryError;

const LOG_TARGET: &str = "server::error";

/// HTTP-facing error, a thin `IntoResponse` wrapper around the command-layer
/// taxonomy (§7). Subscribers never see these (§7 last paragraph) — only
/// request/response command handlers construct one.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Unauthenticated,
    Forbidden(String),
    InvalidState(String),
    InvalidAmount(String),
    Conflict(String),
    StorageUnavailable,
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound => "not_found",
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::InvalidState(_) => "invalid_state",
            ApiError::InvalidAmount(_) => "invalid_amount",
            ApiError::Conflict(_) => "conflict",
            ApiError::StorageUnavailable => "storage_unavailable",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound => "not found".to_string(),
            ApiError::Unauthenticated => "authentication required".to_string(),
            ApiError::Forbidden(m)
            | ApiError::InvalidState(m)
            | ApiError::InvalidAmount(m)
            | ApiError::Conflict(m)
            | ApiError::BadRequest(m)
            | ApiError::Internal(m) => m.clone(),
            ApiError::StorageUnavailable => "storage unavailable".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::NotFound => ApiError::NotFound,
            OrchestratorError::Unauthenticated => ApiError::Unauthenticated,
            OrchestratorError::Forbidden(m) => ApiError::Forbidden(m),
            OrchestratorError::InvalidState(m) => ApiError::InvalidState(m),
            OrchestratorError::InvalidAmount(m) => ApiError::InvalidAmount(m),
            OrchestratorError::Conflict(m) => ApiError::Conflict(m),
            OrchestratorError::StorageUnavailable => ApiError::StorageUnavailable,
            OrchestratorError::Internal => ApiError::Internal("internal error".to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::from(OrchestratorError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Internal(_) | ApiError::StorageUnavailable) {
            error!(target: LOG_TARGET, kind = self.kind(), message = %self.message(), "request failed");
        }
        let status = self.status();
        let body = ErrorBody { kind: self.kind(), message: self.message() };
        (status, Json(body)).into_response()
    }
}
