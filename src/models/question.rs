//! Questions and answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single or multiple choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuestionType {
    #[default]
    Single,
    Multiple,
}

impl QuestionType {
    pub const ALL: [QuestionType; 2] = [QuestionType::Single, QuestionType::Multiple];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }

    /// Human readable label used by the question form
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Single => "Single Choice",
            QuestionType::Multiple => "Multiple Choice",
        }
    }
}

impl TryFrom<String> for QuestionType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            // Older rows were stored without a type
            "" | "single" => Ok(QuestionType::Single),
            "multiple" => Ok(QuestionType::Multiple),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

impl From<QuestionType> for String {
    fn from(value: QuestionType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" | "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}

/// A quiz question as stored by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub quiz_id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionType,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub multi_choice_ans_limit: u32,
    #[serde(default)]
    pub hint_explanation: String,
    #[serde(default)]
    pub difficulty_level: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// An answer option attached to a question
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub question_id: i64,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// Derive answers from a comma separated field.
///
/// Every token is trimmed; exactly the tokens equal to `correct` are flagged
/// as correct. The result always has one entry per token.
pub fn derive_answers(answers_field: &str, correct: &str, question_id: i64) -> Vec<Answer> {
    answers_field
        .split(',')
        .map(str::trim)
        .map(|text| Answer {
            question_id,
            text: text.to_string(),
            is_correct: text == correct,
            ..Default::default()
        })
        .collect()
}

/// Join answer texts back into the comma separated form field
pub fn join_answers(answers: &[Answer]) -> String {
    answers
        .iter()
        .map(|a| a.text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
