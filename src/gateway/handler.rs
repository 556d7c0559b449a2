//! The `evaluate` HTTP handler (§6.1): transport-agnostic operation exposed
//! over a thin Axum POST endpoint.

use axum::Json;
use axum::extract::{Extension, State};
use axum::response::Response;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::instrument;

use super::error::GatewayError;
use super::state::HandlerState;
use crate::attempt::AttemptRepository;
use crate::cache::KvCache;
use crate::embedding::EmbeddingProvider;
use crate::llm::LlmEvaluator;
use crate::orchestrator::RequestAuth;
use crate::quiz::QuizRepository;

/// Body of a `POST /v1/evaluate` request.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    /// 26-character ULID quiz identifier.
    pub quiz_id: String,
    /// The submitted free-form answer text.
    pub user_answer: String,
}

/// Identity placed into request extensions by upstream auth middleware
/// (out of scope for this crate; the handler only reads it).
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Option<String>);

impl From<AuthIdentity> for RequestAuth {
    fn from(identity: AuthIdentity) -> Self {
        match identity.0 {
            Some(user_id) => RequestAuth::User(user_id),
            None => RequestAuth::Anonymous,
        }
    }
}

/// `POST /v1/evaluate`: runs [`crate::orchestrator::Orchestrator::check_answer`]
/// and serializes the resulting [`crate::orchestrator::CheckAnswerOutcome`] as JSON.
#[instrument(skip(state, request), fields(quiz_id = %request.quiz_id))]
pub async fn evaluate_handler<E, K, L, Q, A>(
    State(state): State<HandlerState<E, K, L, Q, A>>,
    identity: Option<Extension<AuthIdentity>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Response, GatewayError>
where
    E: EmbeddingProvider,
    K: KvCache,
    L: LlmEvaluator,
    Q: QuizRepository,
    A: AttemptRepository + 'static,
{
    let _drain_guard = state.lifecycle.begin_request();

    let auth = identity
        .map(|Extension(identity)| identity.into())
        .unwrap_or(RequestAuth::Anonymous);

    let outcome = state
        .orchestrator
        .check_answer(&request.quiz_id, &request.user_answer, auth)
        .await?;

    Ok(Json(outcome).into_response())
}
