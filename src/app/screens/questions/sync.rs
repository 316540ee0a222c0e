//! Pushing saved question slots to the backend.

use crate::client::QuizBackend;
use crate::models::{Answer, Question};
use crate::AppError;
use chrono::Utc;

/// A saved slot as it was when the sync was requested
#[derive(Debug, Clone)]
pub struct SlotSnapshot {
    pub index: usize,
    pub question: Question,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Increases with every sync a screen issues
    pub generation: u64,
    pub quiz_id: i64,
    /// Cached result of an earlier existence check
    pub quiz_exists: Option<bool>,
    pub slots: Vec<SlotSnapshot>,
}

/// Ids the backend holds for one slot after a sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOutcome {
    pub index: usize,
    pub question_id: i64,
    /// One id per answer, by position; 0 where the backend reported none
    pub answer_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub generation: u64,
    pub quiz_id: i64,
    pub quiz_exists: Option<bool>,
    pub slots: Vec<SlotOutcome>,
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

async fn check_quiz_exists(
    backend: &dyn QuizBackend,
    quiz_id: i64,
    errors: &mut Vec<String>,
) -> Option<bool> {
    if quiz_id <= 0 {
        return Some(false);
    }
    match backend.fetch_quiz_questions(quiz_id).await {
        Ok(_) => Some(true),
        Err(AppError::NotFound(_)) => Some(false),
        Err(err) => {
            tracing::warn!(quiz_id, error = %err, "Quiz existence check failed");
            errors.push(format!("Checking quiz {}: {}", quiz_id, err));
            None
        }
    }
}

/// Create or update every slot in the request, then its answers.
///
/// Failures are collected and the remaining slots are still attempted, so
/// a partial failure leaves partial remote state.
pub async fn sync_questions(backend: &dyn QuizBackend, request: SyncRequest) -> SyncReport {
    let mut errors = Vec::new();
    let known = match request.quiz_exists {
        Some(known) => Some(known),
        None => check_quiz_exists(backend, request.quiz_id, &mut errors).await,
    };
    // Unknown after a failed check: trust ids we were given before
    let mut exists = known.unwrap_or_else(|| request.slots.iter().any(|s| s.question.id > 0));
    let mut created = false;
    let now = Utc::now();
    let mut outcomes = Vec::with_capacity(request.slots.len());

    for snapshot in &request.slots {
        let number = snapshot.index + 1;
        let mut question = snapshot.question.clone();
        question.quiz_id = request.quiz_id;
        question.creation_date.get_or_insert(now);
        question.last_modified_date = Some(now);

        let updating = exists && question.id > 0;
        let question_id = if updating {
            match backend.update_question(&question).await {
                Ok(()) => {
                    tracing::info!(question_id = question.id, slot = number, "Updated question");
                    question.id
                }
                Err(err) => {
                    tracing::error!(question_id = question.id, error = %err, "Failed to update question");
                    errors.push(format!("Question {}: {}", number, err));
                    continue;
                }
            }
        } else {
            question.id = 0;
            match backend.create_question(&question).await {
                Ok(id) => {
                    exists = true;
                    created = true;
                    id
                }
                Err(err) => {
                    tracing::error!(slot = number, error = %err, "Failed to create question");
                    errors.push(format!("Question {}: {}", number, err));
                    continue;
                }
            }
        };

        let mut answer_ids = Vec::with_capacity(snapshot.answers.len());
        for answer in &snapshot.answers {
            if answer.text.is_empty() {
                answer_ids.push(0);
                continue;
            }
            let mut answer = answer.clone();
            answer.question_id = question_id;
            answer.creation_date.get_or_insert(now);
            answer.last_modified_date = Some(now);

            if updating && answer.id > 0 {
                if let Err(err) = backend.update_answer(&answer).await {
                    tracing::error!(answer_id = answer.id, error = %err, "Failed to update answer");
                    errors.push(format!("Question {} answer '{}': {}", number, answer.text, err));
                }
                answer_ids.push(answer.id);
            } else {
                answer.id = 0;
                match backend.create_answer(&answer).await {
                    Ok(id) => answer_ids.push(id),
                    Err(err) => {
                        tracing::error!(question_id, error = %err, "Failed to create answer");
                        errors.push(format!("Question {} answer '{}': {}", number, answer.text, err));
                        answer_ids.push(0);
                    }
                }
            }
        }

        outcomes.push(SlotOutcome {
            index: snapshot.index,
            question_id,
            answer_ids,
        });
    }

    tracing::info!(
        quiz_id = request.quiz_id,
        synced = outcomes.len(),
        failed = errors.len(),
        "Question sync finished"
    );
    SyncReport {
        generation: request.generation,
        quiz_id: request.quiz_id,
        quiz_exists: if created { Some(true) } else { known },
        slots: outcomes,
        errors,
    }
}
