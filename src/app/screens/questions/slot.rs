//! One question slot: its form, the last saved question and its answers.

use crate::app::form::{required, Field, Form};
use crate::models::{derive_answers, join_answers, Answer, Difficulty, Question, QuestionType};
use crate::util::{format_points, parse_trimmed};
use crossterm::event::KeyEvent;

use super::sync::SlotSnapshot;

pub const TEXT: &str = "text";
pub const HINT: &str = "hint";
pub const KIND: &str = "type";
pub const LIMIT: &str = "multi_choice_limit";
pub const POINTS: &str = "points";
pub const DIFFICULTY: &str = "difficulty";
pub const ANSWERS: &str = "answers";
pub const CORRECT: &str = "correct_answer";

fn multi_choice_limit(value: &str, form: &Form) -> std::result::Result<(), String> {
    let value = value.trim();
    if form.get(KIND) == QuestionType::Single.as_str() {
        if value.is_empty() {
            Ok(())
        } else {
            Err("Leave empty for single choice questions".to_string())
        }
    } else if value.is_empty() {
        Err("Required for multiple choice questions".to_string())
    } else {
        parse_trimmed::<u32>("Answer limit", value)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

fn points(value: &str, _form: &Form) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match parse_trimmed::<f64>("Points", value) {
        Ok(points) if points >= 0.0 => Ok(()),
        Ok(_) => Err("Points cannot be negative".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn correct_answer(value: &str, form: &Form) -> std::result::Result<(), String> {
    required(value, form)?;
    let answers = form.get(ANSWERS);
    if answers.split(',').map(str::trim).any(|a| a == value.trim()) {
        Ok(())
    } else {
        Err("Must be one of the answers".to_string())
    }
}

fn question_form(question: &Question, answers: &str, correct: &str) -> Form {
    let limit = if question.multi_choice_ans_limit > 0 {
        question.multi_choice_ans_limit.to_string()
    } else {
        String::new()
    };
    let points_value = if question.points > 0.0 {
        format_points(question.points)
    } else {
        String::new()
    };
    Form::new(vec![
        Field::input(TEXT, "Question")
            .value(&question.text)
            .validate_with(required),
        Field::input(HINT, "Hint / Explanation").value(&question.hint_explanation),
        Field::select(
            KIND,
            "Question Type",
            &QuestionType::ALL.map(|kind| (kind.label(), kind.as_str())),
        )
        .value(question.kind.as_str()),
        Field::input(LIMIT, "Multiple Choice Answer Limit")
            .description("Leave empty for single choice questions")
            .value(&limit)
            .validate_with(multi_choice_limit),
        Field::input(POINTS, "Points")
            .value(&points_value)
            .validate_with(points),
        Field::select(
            DIFFICULTY,
            "Difficulty",
            &Difficulty::ALL.map(|level| (level.label(), level.as_str())),
        )
        .value(question.difficulty_level.as_str()),
        Field::input(ANSWERS, "Answers")
            .description("Comma separated, e.g. Paris,London,Berlin")
            .value(answers)
            .validate_with(required),
        Field::input(CORRECT, "Correct Answer")
            .value(correct)
            .validate_with(correct_answer),
    ])
}

#[derive(Debug, Clone)]
pub struct QuestionSlot {
    index: usize,
    question: Question,
    answers: Vec<Answer>,
    correct_answer: String,
    form: Form,
    edited: bool,
}

impl QuestionSlot {
    pub fn empty(index: usize, quiz_id: i64) -> Self {
        let question = Question {
            quiz_id,
            ..Default::default()
        };
        Self {
            index,
            form: question_form(&question, "", ""),
            question,
            answers: Vec::new(),
            correct_answer: String::new(),
            edited: false,
        }
    }

    /// Slot prefilled from a question stored remotely
    pub fn from_remote(index: usize, question: Question, answers: Vec<Answer>) -> Self {
        let correct_answer = answers
            .iter()
            .find(|a| a.is_correct)
            .map(|a| a.text.clone())
            .unwrap_or_default();
        Self {
            index,
            form: question_form(&question, &join_answers(&answers), &correct_answer),
            question,
            answers,
            correct_answer,
            edited: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        self.edited = true;
        &mut self.form
    }

    /// Whether the operator changed anything in this slot
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn is_completed(&self) -> bool {
        self.form.is_completed()
    }

    /// Nothing worth sending to the backend
    pub fn is_blank(&self) -> bool {
        self.question.text.trim().is_empty() && self.answers.iter().all(|a| a.text.is_empty())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.form.handle_key(key) {
            self.edited = true;
        }
    }

    /// Copy the form into the question and re-derive its answers.
    ///
    /// Previously synced answer ids are kept by position so the next sync
    /// updates those answers instead of creating new ones.
    pub fn save(&mut self) {
        let form = &self.form;
        let kind = QuestionType::try_from(form.get(KIND)).unwrap_or_default();

        self.question.text = form.get(TEXT).trim().to_string();
        self.question.hint_explanation = form.get(HINT).trim().to_string();
        self.question.kind = kind;
        self.question.difficulty_level = Difficulty::try_from(form.get(DIFFICULTY)).unwrap_or_default();
        self.question.multi_choice_ans_limit = match kind {
            QuestionType::Single => 0,
            QuestionType::Multiple => parse_trimmed("Answer limit", &form.get(LIMIT)).unwrap_or(0),
        };
        let points = form.get(POINTS);
        self.question.points = if points.trim().is_empty() {
            0.0
        } else {
            parse_trimmed("Points", &points).unwrap_or_else(|err| {
                tracing::warn!(slot = self.index, error = %err, "Ignoring invalid points");
                0.0
            })
        };

        self.correct_answer = form.get(CORRECT).trim().to_string();
        let mut answers = derive_answers(&form.get(ANSWERS), &self.correct_answer, self.question.id);
        for (answer, previous) in answers.iter_mut().zip(&self.answers) {
            answer.id = previous.id;
        }
        self.answers = answers;
        tracing::debug!(slot = self.index, answers = self.answers.len(), "Saved question slot");
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        SlotSnapshot {
            index: self.index,
            question: self.question.clone(),
            answers: self.answers.clone(),
        }
    }

    /// Record ids assigned by the backend
    pub fn apply_sync(&mut self, question_id: i64, answer_ids: &[i64]) {
        if question_id > 0 {
            self.question.id = question_id;
            for answer in &mut self.answers {
                answer.question_id = question_id;
            }
        }
        for (answer, id) in self.answers.iter_mut().zip(answer_ids) {
            if *id > 0 {
                answer.id = *id;
            }
        }
    }
}
