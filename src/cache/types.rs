//! Cache-owned data types.

use rkyv::{Archive, Deserialize, Serialize};

use crate::orchestrator::types::EvaluationPayload;

/// A similarity-cache entry: the evaluation, the embedding it was filed
/// under, and the original answer text (kept for debugging/integrity).
///
/// Encoded with the self-describing binary codec in [`crate::cache::codec`]
/// (mirrors the teacher's `storage::model::CacheEntry`).
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct CachedEvaluation {
    /// Evaluation payload produced by the LLM evaluator.
    pub evaluation: EvaluationPayload,
    /// Embedding of `user_answer_text`, used for the cosine-similarity scan.
    pub embedding: Vec<f32>,
    /// Verbatim user-submitted answer text this entry was stored under.
    pub user_answer_text: String,
}
