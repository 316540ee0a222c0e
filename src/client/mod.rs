//! Remote data client
//!
//! The [`QuizBackend`] trait is the only boundary between the session and the
//! REST backend. Calls are issued from spawned command tasks, never from the
//! UI loop itself.

pub mod http;
pub mod timed;

use crate::models::{Answer, Question, QuizMetadata, QuizRow};
use crate::Result;
use async_trait::async_trait;

pub use http::HttpBackend;
pub use timed::TimedBackend;

/// Operations the authoring flow needs from the backend.
///
/// Missing resources surface as [`crate::AppError::NotFound`], non-success
/// statuses as [`crate::AppError::Status`] carrying the raw body.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// All quizzes as stored, without name resolution
    async fn list_quizzes(&self) -> Result<Vec<QuizMetadata>>;

    async fn fetch_quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>>;

    async fn fetch_question_answers(&self, question_id: i64) -> Result<Vec<Answer>>;

    /// Create a question and return its new id
    async fn create_question(&self, question: &Question) -> Result<i64>;

    async fn update_question(&self, question: &Question) -> Result<()>;

    /// Create an answer; returns the new id, or 0 if the backend did not report one
    async fn create_answer(&self, answer: &Answer) -> Result<i64>;

    async fn update_answer(&self, answer: &Answer) -> Result<()>;

    /// Create a quiz and return its new id
    async fn create_quiz(&self, quiz: &QuizMetadata) -> Result<i64>;

    async fn update_quiz(&self, quiz: &QuizMetadata) -> Result<()>;

    async fn resolve_category_id(&self, name: &str) -> Result<i64>;

    /// Category `(name, description)` for an id
    async fn resolve_category_name(&self, id: i64) -> Result<(String, String)>;

    async fn resolve_creator_id(&self, name: &str) -> Result<i64>;

    async fn resolve_creator_name(&self, id: i64) -> Result<String>;

    /// Category names for input suggestions
    async fn list_category_names(&self) -> Result<Vec<String>>;

    /// Quizzes projected into listing rows.
    ///
    /// A quiz whose category or creator cannot be resolved is left out of
    /// the listing rather than shown incomplete.
    async fn fetch_quizzes(&self) -> Result<Vec<QuizRow>> {
        let quizzes = self.list_quizzes().await?;
        tracing::info!(count = quizzes.len(), "Fetched quizzes");

        let mut rows = Vec::with_capacity(quizzes.len());
        for quiz in &quizzes {
            let category = match self.resolve_category_name(quiz.category_id).await {
                Ok((name, _)) => name,
                Err(err) => {
                    tracing::warn!(quiz_id = quiz.id, error = %err, "Dropping quiz, category lookup failed");
                    continue;
                }
            };
            let creator = match self.resolve_creator_name(quiz.creator_id).await {
                Ok(name) => name,
                Err(err) => {
                    tracing::warn!(quiz_id = quiz.id, error = %err, "Dropping quiz, creator lookup failed");
                    continue;
                }
            };
            rows.push(QuizRow::from_quiz(quiz, category, creator));
        }

        tracing::info!(resolved = rows.len(), "Resolved quiz rows");
        Ok(rows)
    }
}
