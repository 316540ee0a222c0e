//! REST client for the quiz backend.
//!
//! Wraps the backend's JSON resource routes (`/quizzes`, `/questions`,
//! `/answers`, `/categories`, `/users`) using [`reqwest`].

use super::QuizBackend;
use crate::models::{Answer, Category, Question, QuizMetadata, User};
use crate::{AppError, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for one backend instance
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

/// `{"id": ..}` body returned by create and by-name routes
#[derive(Debug, Deserialize)]
struct IdResponse {
    #[serde(default)]
    id: i64,
}

impl HttpBackend {
    /// Create a client for `base_url`, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid backend URL {}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL from path segments; each segment is
    /// percent-encoded, so spaces become `%20`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Backend URL {} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<String> {
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    async fn put_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<()> {
        tracing::debug!(%url, "PUT");
        let response = self.client.put(url).json(body).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Ensure the response has a success status code, or turn it into an
    /// [`AppError::Status`] with the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), %body, "Backend returned an error status");
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body. The body is read as text first
    /// so plain-text error bodies end up as decode errors.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, %body, "Failed to decode response");
            AppError::Decode(format!("{}: {}", e, body.trim()))
        })
    }

    fn parse_id(body: &str) -> Result<i64> {
        if body.trim().is_empty() {
            return Err(AppError::Decode("response body is empty".to_string()));
        }
        let parsed: IdResponse = serde_json::from_str(body)?;
        Ok(parsed.id)
    }
}

/// Map a 404 status onto a more specific error
fn not_found_as(err: AppError, mapped: impl FnOnce() -> AppError) -> AppError {
    match err {
        AppError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => mapped(),
        other => other,
    }
}

#[async_trait]
impl QuizBackend for HttpBackend {
    async fn list_quizzes(&self) -> Result<Vec<QuizMetadata>> {
        self.get_json(self.endpoint(&["quizzes"])?).await
    }

    async fn fetch_quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        let id = quiz_id.to_string();
        self.get_json(self.endpoint(&["quizzes", &id, "questions"])?)
            .await
            .map_err(|e| not_found_as(e, || AppError::NotFound(format!("quiz {}", quiz_id))))
    }

    async fn fetch_question_answers(&self, question_id: i64) -> Result<Vec<Answer>> {
        let id = question_id.to_string();
        self.get_json(self.endpoint(&["questions", &id, "answers"])?)
            .await
            .map_err(|e| {
                not_found_as(e, || AppError::NotFound(format!("question {}", question_id)))
            })
    }

    async fn create_question(&self, question: &Question) -> Result<i64> {
        let body = self.post_json(self.endpoint(&["questions"])?, question).await?;
        let id = Self::parse_id(&body)?;
        if id == 0 {
            return Err(AppError::Decode(format!("question create returned no id: {}", body)));
        }
        tracing::info!(question_id = id, "Created question");
        Ok(id)
    }

    async fn update_question(&self, question: &Question) -> Result<()> {
        let id = question.id.to_string();
        self.put_json(self.endpoint(&["questions", &id])?, question).await
    }

    async fn create_answer(&self, answer: &Answer) -> Result<i64> {
        let body = self.post_json(self.endpoint(&["answers"])?, answer).await?;
        // Older backends answer with an empty body
        if body.trim().is_empty() {
            return Ok(0);
        }
        Self::parse_id(&body)
    }

    async fn update_answer(&self, answer: &Answer) -> Result<()> {
        let id = answer.id.to_string();
        self.put_json(self.endpoint(&["answers", &id])?, answer).await
    }

    async fn create_quiz(&self, quiz: &QuizMetadata) -> Result<i64> {
        let body = self.post_json(self.endpoint(&["quizzes"])?, quiz).await?;
        let id = Self::parse_id(&body)?;
        tracing::info!(quiz_id = id, "Created quiz");
        Ok(id)
    }

    async fn update_quiz(&self, quiz: &QuizMetadata) -> Result<()> {
        let id = quiz.id.to_string();
        self.put_json(self.endpoint(&["quizzes", &id])?, quiz).await
    }

    async fn resolve_category_id(&self, name: &str) -> Result<i64> {
        let response: IdResponse = self
            .get_json(self.endpoint(&["categories", "byname", name])?)
            .await
            .map_err(|e| not_found_as(e, || AppError::LookupNotFound(name.to_string())))?;
        Ok(response.id)
    }

    async fn resolve_category_name(&self, id: i64) -> Result<(String, String)> {
        let id_segment = id.to_string();
        let category: Category = self
            .get_json(self.endpoint(&["categories", &id_segment])?)
            .await
            .map_err(|e| not_found_as(e, || AppError::NotFound(format!("category {}", id))))?;
        Ok((category.name, category.description))
    }

    async fn resolve_creator_id(&self, name: &str) -> Result<i64> {
        let response: IdResponse = self
            .get_json(self.endpoint(&["users", "byname", name])?)
            .await
            .map_err(|e| not_found_as(e, || AppError::LookupNotFound(name.to_string())))?;
        Ok(response.id)
    }

    async fn resolve_creator_name(&self, id: i64) -> Result<String> {
        let id_segment = id.to_string();
        let user: User = self
            .get_json(self.endpoint(&["users", &id_segment])?)
            .await
            .map_err(|e| not_found_as(e, || AppError::NotFound(format!("user {}", id))))?;
        Ok(user.user_name)
    }

    async fn list_category_names(&self) -> Result<Vec<String>> {
        let categories: Vec<Category> = self.get_json(self.endpoint(&["categories"])?).await?;
        Ok(categories.into_iter().map(|c| c.name).collect())
    }
}
