//! HTTP error mapping for the evaluate endpoint (§6.1 error codes).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::orchestrator::OrchestratorError;

/// The structured error body returned on any non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// One of `VALIDATION`, `QUIZ_NOT_FOUND`, `LLM_SERVICE_UNAVAILABLE`, `INTERNAL`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Wraps an [`OrchestratorError`] for the HTTP boundary.
#[derive(Debug)]
pub struct GatewayError(pub OrchestratorError);

impl From<OrchestratorError> for GatewayError {
    fn from(err: OrchestratorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            OrchestratorError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION"),
            OrchestratorError::QuizNotFound => (StatusCode::NOT_FOUND, "QUIZ_NOT_FOUND"),
            OrchestratorError::UpstreamUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "LLM_SERVICE_UNAVAILABLE")
            }
            OrchestratorError::DataIntegrity | OrchestratorError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL")
            }
        };

        let body = ErrorBody {
            code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
