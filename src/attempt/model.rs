//! Attempt record data model (§3): external, write-only from the core.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::orchestrator::types::EvaluationPayload;
use crate::quiz::QuizId;

/// A durable record of one authenticated user's answer submission and its
/// evaluation (flattened).
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    /// Stable identifier for this attempt.
    pub id: Uuid,
    /// Identifier of the authenticated user who submitted the answer.
    pub user_id: String,
    /// Quiz the answer was submitted against.
    pub quiz_id: QuizId,
    /// Verbatim submitted answer text.
    pub user_answer_text: String,
    /// Full evaluation payload, flattened onto the record.
    pub evaluation: EvaluationPayload,
    /// Derived: `evaluation.score >= correctness_threshold`.
    pub is_correct: bool,
    /// When the attempt was recorded.
    pub attempted_at: DateTime<Utc>,
}

impl AttemptRecord {
    /// Builds a new attempt record, deriving `is_correct` from `threshold`.
    pub fn new(
        user_id: String,
        quiz_id: QuizId,
        user_answer_text: String,
        evaluation: EvaluationPayload,
        threshold: f32,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        let is_correct = evaluation.is_correct(threshold);
        Self {
            id: Uuid::new_v4(),
            user_id,
            quiz_id,
            user_answer_text,
            evaluation,
            is_correct,
            attempted_at,
        }
    }
}
