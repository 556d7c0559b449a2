//! Shared result types produced by the evaluation orchestrator.

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Rubric-scored evaluation of a user's answer.
///
/// Round-trips through both the binary cache codec (nested inside
/// [`crate::cache::types::CachedEvaluation`]) and plain JSON (the anonymous
/// result cache and the gateway response body), so it derives both `rkyv`
/// and `serde` traits.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
pub struct EvaluationPayload {
    /// Overall score in `[0, 1]`.
    pub score: f32,
    /// Free-text explanation, bounded to roughly 100 words.
    pub explanation: String,
    /// Keywords from the quiz that the answer matched.
    pub keyword_matches: Vec<String>,
    /// Completeness sub-score in `[0, 1]`.
    pub completeness: f32,
    /// Relevance sub-score in `[0, 1]`.
    pub relevance: f32,
    /// Accuracy sub-score in `[0, 1]`.
    pub accuracy: f32,
    /// The quiz's model answers joined by newline, attached for freshness on every return path.
    pub model_answer: Option<String>,
}

impl EvaluationPayload {
    /// Clamps every numeric field into `[0, 1]`, per the LLM response parsing algorithm.
    pub fn clamp_scores(&mut self) {
        self.score = self.score.clamp(0.0, 1.0);
        self.completeness = self.completeness.clamp(0.0, 1.0);
        self.relevance = self.relevance.clamp(0.0, 1.0);
        self.accuracy = self.accuracy.clamp(0.0, 1.0);
    }

    /// Drops keyword matches that are not present in `allowed` (defensive parsing).
    pub fn retain_allowed_keywords(&mut self, allowed: &[String]) {
        self.keyword_matches.retain(|k| allowed.contains(k));
    }

    /// `true` when the score meets or exceeds `threshold`.
    pub fn is_correct(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

/// Result of [`crate::orchestrator::Orchestrator::check_answer`].
///
/// Anonymous submissions are keyed into the Anonymous Result Cache under a
/// freshly generated id; per §9 that id is surfaced back to the caller here
/// so a later out-of-band lookup can retrieve the same result. Authenticated
/// submissions are persisted under the user's identity instead, so there is
/// no id to hand back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckAnswerOutcome {
    /// The rubric-scored evaluation.
    #[serde(flatten)]
    pub evaluation: EvaluationPayload,
    /// The Anonymous Result Cache key, present only for anonymous requests.
    pub anonymous_request_id: Option<String>,
}
