//! Per-call deadline around any [`QuizBackend`].
//!
//! Commands make a data-dependent number of calls (one per quiz, question
//! or answer), so the deadline applies to each call rather than to the
//! command as a whole.

use super::QuizBackend;
use crate::models::{Answer, Question, QuizMetadata};
use crate::{AppError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct TimedBackend {
    inner: Arc<dyn QuizBackend>,
    per_call: Duration,
}

impl TimedBackend {
    pub fn new(inner: Arc<dyn QuizBackend>, per_call: Duration) -> Self {
        Self { inner, per_call }
    }

    async fn bounded<T>(&self, call: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.per_call, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(call, timeout = ?self.per_call, "Backend call timed out");
                Err(AppError::Timeout(format!("{} after {:?}", call, self.per_call)))
            }
        }
    }
}

#[async_trait]
impl QuizBackend for TimedBackend {
    async fn list_quizzes(&self) -> Result<Vec<QuizMetadata>> {
        self.bounded("list_quizzes", self.inner.list_quizzes()).await
    }

    async fn fetch_quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        self.bounded("fetch_quiz_questions", self.inner.fetch_quiz_questions(quiz_id))
            .await
    }

    async fn fetch_question_answers(&self, question_id: i64) -> Result<Vec<Answer>> {
        self.bounded("fetch_question_answers", self.inner.fetch_question_answers(question_id))
            .await
    }

    async fn create_question(&self, question: &Question) -> Result<i64> {
        self.bounded("create_question", self.inner.create_question(question))
            .await
    }

    async fn update_question(&self, question: &Question) -> Result<()> {
        self.bounded("update_question", self.inner.update_question(question))
            .await
    }

    async fn create_answer(&self, answer: &Answer) -> Result<i64> {
        self.bounded("create_answer", self.inner.create_answer(answer)).await
    }

    async fn update_answer(&self, answer: &Answer) -> Result<()> {
        self.bounded("update_answer", self.inner.update_answer(answer)).await
    }

    async fn create_quiz(&self, quiz: &QuizMetadata) -> Result<i64> {
        self.bounded("create_quiz", self.inner.create_quiz(quiz)).await
    }

    async fn update_quiz(&self, quiz: &QuizMetadata) -> Result<()> {
        self.bounded("update_quiz", self.inner.update_quiz(quiz)).await
    }

    async fn resolve_category_id(&self, name: &str) -> Result<i64> {
        self.bounded("resolve_category_id", self.inner.resolve_category_id(name))
            .await
    }

    async fn resolve_category_name(&self, id: i64) -> Result<(String, String)> {
        self.bounded("resolve_category_name", self.inner.resolve_category_name(id))
            .await
    }

    async fn resolve_creator_id(&self, name: &str) -> Result<i64> {
        self.bounded("resolve_creator_id", self.inner.resolve_creator_id(name))
            .await
    }

    async fn resolve_creator_name(&self, id: i64) -> Result<String> {
        self.bounded("resolve_creator_name", self.inner.resolve_creator_name(id))
            .await
    }

    async fn list_category_names(&self) -> Result<Vec<String>> {
        self.bounded("list_category_names", self.inner.list_category_names())
            .await
    }
}
