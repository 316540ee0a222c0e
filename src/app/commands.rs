//! Runs [`Command`]s against the backend off the UI loop.

use crate::app::event::{AppEvent, Command, MetadataSubmission, NetworkEvent};
use crate::app::screens::questions::sync_questions;
use crate::client::{QuizBackend, TimedBackend};
use crate::error::{retry_async, RetryConfig};
use crate::models::{Answer, CreateQuizOrigin, Question, QuizMetadata};
use crate::{AppError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Execute a command to completion and produce its result event
pub async fn execute(backend: Arc<dyn QuizBackend>, command: Command) -> NetworkEvent {
    match command {
        Command::FetchQuizzes => {
            let result = retry_async(
                || {
                    let backend = backend.clone();
                    async move { backend.fetch_quizzes().await }
                },
                RetryConfig::default(),
            )
            .await;
            NetworkEvent::QuizzesLoaded(result)
        }
        Command::LoadCategoryNames => {
            let result = retry_async(
                || {
                    let backend = backend.clone();
                    async move { backend.list_category_names().await }
                },
                RetryConfig::default(),
            )
            .await;
            NetworkEvent::CategoryNamesLoaded(result)
        }
        Command::SubmitQuizMetadata {
            quiz,
            category_name,
            origin,
            creator_name,
        } => NetworkEvent::QuizMetadataSubmitted(
            submit_metadata(backend.as_ref(), quiz, &category_name, origin, creator_name.as_deref())
                .await,
        ),
        Command::LoadQuestions { quiz_id } => NetworkEvent::QuestionsLoaded {
            quiz_id,
            result: load_questions(backend.as_ref(), quiz_id).await,
        },
        Command::SyncQuestions(request) => {
            NetworkEvent::QuestionsSynced(sync_questions(backend.as_ref(), request).await)
        }
    }
}

/// Resolve the category, then create or update the quiz.
///
/// Only an unresolvable category fails the submission; a failed create or
/// update is reported as a warning so the operator can carry on.
pub async fn submit_metadata(
    backend: &dyn QuizBackend,
    mut quiz: QuizMetadata,
    category_name: &str,
    origin: CreateQuizOrigin,
    creator_name: Option<&str>,
) -> Result<MetadataSubmission> {
    quiz.category_id = backend.resolve_category_id(category_name).await?;
    let now = Utc::now();
    quiz.last_modified_date = Some(now);

    let persisted = if origin.is_update() {
        backend.update_quiz(&quiz).await
    } else {
        if let Some(name) = creator_name {
            match backend.resolve_creator_id(name).await {
                Ok(id) => quiz.creator_id = id,
                Err(err) => tracing::warn!(creator = name, error = %err, "Creator lookup failed"),
            }
        }
        quiz.creation_date = Some(now);
        backend.create_quiz(&quiz).await.map(|id| quiz.id = id)
    };

    let warning = match persisted {
        Ok(()) => {
            tracing::info!(quiz_id = quiz.id, origin = ?origin, "Quiz metadata saved");
            None
        }
        Err(err) => {
            tracing::error!(quiz_id = quiz.id, error = %err, "Failed to save quiz metadata");
            Some(format!("Quiz was not saved: {}", err))
        }
    };
    Ok(MetadataSubmission { quiz, warning })
}

/// Questions of a quiz with their answers.
///
/// A question whose answers cannot be fetched comes back without answers.
pub async fn load_questions(
    backend: &dyn QuizBackend,
    quiz_id: i64,
) -> Result<Vec<(Question, Vec<Answer>)>> {
    let questions = backend.fetch_quiz_questions(quiz_id).await?;
    let mut loaded = Vec::with_capacity(questions.len());
    for question in questions {
        let answers = match backend.fetch_question_answers(question.id).await {
            Ok(answers) => answers,
            Err(AppError::NotFound(_)) => Vec::new(),
            Err(err) => {
                tracing::warn!(question_id = question.id, error = %err, "Failed to fetch answers");
                Vec::new()
            }
        };
        loaded.push((question, answers));
    }
    tracing::info!(quiz_id, count = loaded.len(), "Loaded quiz questions");
    Ok(loaded)
}

/// Run `command` on the tokio runtime and send its result to `tx`.
///
/// Every backend call the command makes is bounded by `per_request`; a call
/// that runs past it fails with [`AppError::Timeout`] like any other error.
pub fn spawn_command(
    backend: Arc<dyn QuizBackend>,
    command: Command,
    per_request: Duration,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    let backend: Arc<dyn QuizBackend> = Arc::new(TimedBackend::new(backend, per_request));
    tokio::spawn(async move {
        let name = command.name();
        tracing::debug!(command = name, ?per_request, "Running command");
        let event = execute(backend, command).await;
        if tx.send(AppEvent::Network(event)).is_err() {
            tracing::debug!(command = name, "UI loop gone, dropping result");
        }
    })
}
