//! Quiz data model (§3): external, read-only to the core.

use std::fmt;
use std::str::FromStr;

use ulid::Ulid;

use super::error::QuizIdError;

/// A 26-character Crockford-base32 (ULID) quiz identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuizId(String);

impl QuizId {
    /// Parses and validates `value` as a well-formed quiz identifier.
    pub fn parse(value: &str) -> Result<Self, QuizIdError> {
        if value.len() == crate::constants::ULID_LEN && Ulid::from_string(value).is_ok() {
            Ok(Self(value.to_string()))
        } else {
            Err(QuizIdError::InvalidFormat {
                value: value.to_string(),
            })
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for QuizId {
    type Err = QuizIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Difficulty level of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    /// Introductory material.
    Easy,
    /// Standard material.
    Medium,
    /// Advanced material.
    Hard,
}

/// A quiz: stable identity, question content, and grading inputs.
///
/// Owned and served by an external repository; the core only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    /// Stable identifier.
    pub id: QuizId,
    /// The question text presented to the user.
    pub question: String,
    /// Ordered sequence of acceptable model answers.
    pub model_answers: Vec<String>,
    /// Keywords the LLM evaluator may match against.
    pub keywords: Vec<String>,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Identifier of the owning sub-category.
    pub sub_category_id: String,
}

impl Quiz {
    /// Joins every model answer with a newline, for the `model_answer` field
    /// attached to every evaluation response.
    pub fn joined_model_answers(&self) -> String {
        self.model_answers.join("\n")
    }
}
