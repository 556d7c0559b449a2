//! Thin HTTP surface over the orchestrator (§6.1). Out of scope per the
//! spec's own framing: OAuth, quiz/category CRUD, and recommendation
//! endpoints — this module exposes only the `evaluate` operation plus
//! health/readiness probes.

pub mod error;
pub mod handler;
pub mod state;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{AuthIdentity, EvaluateRequest, evaluate_handler};
pub use state::HandlerState;

use crate::attempt::AttemptRepository;
use crate::cache::KvCache;
use crate::embedding::EmbeddingProvider;
use crate::llm::LlmEvaluator;
use crate::quiz::QuizRepository;

/// Builds the router: `POST /v1/evaluate`, `GET /healthz`.
pub fn create_router<E, K, L, Q, A>(state: HandlerState<E, K, L, Q, A>) -> Router
where
    E: EmbeddingProvider + 'static,
    K: KvCache + 'static,
    L: LlmEvaluator + 'static,
    Q: QuizRepository + 'static,
    A: AttemptRepository + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/evaluate", post(evaluate_handler::<E, K, L, Q, A>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[tracing::instrument]
async fn health_handler() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}
