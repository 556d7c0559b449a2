//! Quiz repository: the external, read-only collaborator the orchestrator
//! reads quiz content from.

pub mod error;
pub mod model;

pub use error::{QuizIdError, QuizRepositoryError};
pub use model::{Difficulty, Quiz, QuizId};

use async_trait::async_trait;

/// External quiz lookup consumed by the orchestrator (§6.2).
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Fetches a quiz by id, or `Ok(None)` if it does not exist.
    async fn get_quiz_by_id(&self, id: &QuizId) -> Result<Option<Quiz>, QuizRepositoryError>;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory [`QuizRepository`] for tests.

    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::{Quiz, QuizId, QuizRepository, QuizRepositoryError};

    /// Fixed-table quiz repository, seeded up front.
    #[derive(Default)]
    pub struct InMemoryQuizRepository {
        quizzes: RwLock<HashMap<QuizId, Quiz>>,
    }

    impl InMemoryQuizRepository {
        /// Creates a repository seeded with `quizzes`.
        pub fn new(quizzes: Vec<Quiz>) -> Self {
            let mut map = HashMap::new();
            for quiz in quizzes {
                map.insert(quiz.id.clone(), quiz);
            }
            Self {
                quizzes: RwLock::new(map),
            }
        }

        /// Inserts or replaces a quiz.
        pub async fn upsert(&self, quiz: Quiz) {
            self.quizzes.write().await.insert(quiz.id.clone(), quiz);
        }
    }

    #[async_trait]
    impl QuizRepository for InMemoryQuizRepository {
        async fn get_quiz_by_id(&self, id: &QuizId) -> Result<Option<Quiz>, QuizRepositoryError> {
            Ok(self.quizzes.read().await.get(id).cloned())
        }
    }
}
