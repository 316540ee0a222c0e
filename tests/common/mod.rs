//! In-memory backend shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use letsquiz::client::QuizBackend;
use letsquiz::models::{Answer, Category, Question, QuizMetadata, User};
use letsquiz::{AppError, Result};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct State {
    pub quizzes: Vec<QuizMetadata>,
    pub categories: Vec<Category>,
    pub users: Vec<User>,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub next_id: i64,
    /// Every call as "METHOD /path"
    pub calls: Vec<String>,
    /// Transport failure for every call
    pub offline: bool,
    pub fail_quiz_writes: bool,
    /// Creating a question with this text fails with a 500
    pub reject_question_text: Option<String>,
    /// Latency added to every call
    pub call_delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

fn server_error() -> AppError {
    AppError::Status {
        status: 500,
        body: "invalid transaction".to_string(),
    }
}

impl FakeBackend {
    /// Backend knowing category "Geography" (3) and user "ada" (11)
    pub fn new() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state();
            state.next_id = 100;
            state.categories.push(Category {
                id: 3,
                name: "Geography".to_string(),
                description: "Places".to_string(),
            });
            state.categories.push(Category {
                id: 5,
                name: "History".to_string(),
                description: String::new(),
            });
            state.users.push(User {
                id: 11,
                user_name: "ada".to_string(),
            });
        }
        backend
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Store a quiz with one question "Capital of France?" (id 9) and
    /// answers Paris (correct) and Lyon
    pub fn with_existing_quiz(self) -> Self {
        {
            let mut state = self.state();
            state.quizzes.push(QuizMetadata {
                id: 4,
                title: "Capitals".to_string(),
                description: "European capitals".to_string(),
                category_id: 3,
                creator_id: 11,
                time_limit_in_mins: 10,
                question_count: 2,
                is_active: true,
                ..Default::default()
            });
            state.questions.push(Question {
                id: 9,
                quiz_id: 4,
                text: "Capital of France?".to_string(),
                points: 1.0,
                ..Default::default()
            });
            state.answers.push(Answer {
                id: 20,
                question_id: 9,
                text: "Paris".to_string(),
                is_correct: true,
                ..Default::default()
            });
            state.answers.push(Answer {
                id: 21,
                question_id: 9,
                text: "Lyon".to_string(),
                ..Default::default()
            });
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    async fn pause(&self) {
        let delay = self.state().call_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn record(&self, call: String) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(call);
        if state.offline {
            return Err(AppError::Request("connection refused".to_string()));
        }
        Ok(state)
    }
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[async_trait]
impl QuizBackend for FakeBackend {
    async fn list_quizzes(&self) -> Result<Vec<QuizMetadata>> {
        self.pause().await;
        let state = self.record("GET /quizzes".to_string())?;
        Ok(state.quizzes.clone())
    }

    async fn fetch_quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        self.pause().await;
        let state = self.record(format!("GET /quizzes/{}/questions", quiz_id))?;
        if !state.quizzes.iter().any(|q| q.id == quiz_id) {
            return Err(AppError::NotFound(format!("quiz {}", quiz_id)));
        }
        Ok(state
            .questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn fetch_question_answers(&self, question_id: i64) -> Result<Vec<Answer>> {
        self.pause().await;
        let state = self.record(format!("GET /questions/{}/answers", question_id))?;
        if !state.questions.iter().any(|q| q.id == question_id) {
            return Err(AppError::NotFound(format!("question {}", question_id)));
        }
        Ok(state
            .answers
            .iter()
            .filter(|a| a.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn create_question(&self, question: &Question) -> Result<i64> {
        self.pause().await;
        let mut state = self.record("POST /questions".to_string())?;
        if state.reject_question_text.as_deref() == Some(question.text.as_str()) {
            return Err(server_error());
        }
        let id = state.allocate_id();
        state.questions.push(Question {
            id,
            ..question.clone()
        });
        Ok(id)
    }

    async fn update_question(&self, question: &Question) -> Result<()> {
        self.pause().await;
        let mut state = self.record(format!("PUT /questions/{}", question.id))?;
        match state.questions.iter_mut().find(|q| q.id == question.id) {
            Some(stored) => {
                *stored = question.clone();
                Ok(())
            }
            None => Err(AppError::Status {
                status: 404,
                body: "Question not found".to_string(),
            }),
        }
    }

    async fn create_answer(&self, answer: &Answer) -> Result<i64> {
        self.pause().await;
        let mut state = self.record("POST /answers".to_string())?;
        let id = state.allocate_id();
        state.answers.push(Answer {
            id,
            ..answer.clone()
        });
        Ok(id)
    }

    async fn update_answer(&self, answer: &Answer) -> Result<()> {
        self.pause().await;
        let mut state = self.record(format!("PUT /answers/{}", answer.id))?;
        match state.answers.iter_mut().find(|a| a.id == answer.id) {
            Some(stored) => {
                *stored = answer.clone();
                Ok(())
            }
            None => Err(AppError::Status {
                status: 404,
                body: "Answer not found".to_string(),
            }),
        }
    }

    async fn create_quiz(&self, quiz: &QuizMetadata) -> Result<i64> {
        self.pause().await;
        let mut state = self.record("POST /quizzes".to_string())?;
        if state.fail_quiz_writes {
            return Err(server_error());
        }
        let id = state.allocate_id();
        state.quizzes.push(QuizMetadata {
            id,
            ..quiz.clone()
        });
        Ok(id)
    }

    async fn update_quiz(&self, quiz: &QuizMetadata) -> Result<()> {
        self.pause().await;
        let mut state = self.record(format!("PUT /quizzes/{}", quiz.id))?;
        if state.fail_quiz_writes {
            return Err(server_error());
        }
        match state.quizzes.iter_mut().find(|q| q.id == quiz.id) {
            Some(stored) => {
                *stored = quiz.clone();
                Ok(())
            }
            None => Err(AppError::Status {
                status: 404,
                body: "Quiz not found".to_string(),
            }),
        }
    }

    async fn resolve_category_id(&self, name: &str) -> Result<i64> {
        self.pause().await;
        let state = self.record(format!("GET /categories/byname/{}", name))?;
        state
            .categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .ok_or_else(|| AppError::LookupNotFound(name.to_string()))
    }

    async fn resolve_category_name(&self, id: i64) -> Result<(String, String)> {
        self.pause().await;
        let state = self.record(format!("GET /categories/{}", id))?;
        state
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| (c.name.clone(), c.description.clone()))
            .ok_or_else(|| AppError::NotFound(format!("category {}", id)))
    }

    async fn resolve_creator_id(&self, name: &str) -> Result<i64> {
        self.pause().await;
        let state = self.record(format!("GET /users/byname/{}", name))?;
        state
            .users
            .iter()
            .find(|u| u.user_name == name)
            .map(|u| u.id)
            .ok_or_else(|| AppError::LookupNotFound(name.to_string()))
    }

    async fn resolve_creator_name(&self, id: i64) -> Result<String> {
        self.pause().await;
        let state = self.record(format!("GET /users/{}", id))?;
        state
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.user_name.clone())
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn list_category_names(&self) -> Result<Vec<String>> {
        self.pause().await;
        let state = self.record("GET /categories".to_string())?;
        Ok(state.categories.iter().map(|c| c.name.clone()).collect())
    }
}
