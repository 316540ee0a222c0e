//! Quiz metadata and the listing projection shown on the edit screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quiz metadata as stored by the backend.
///
/// An `id` of 0 means the quiz has not been created remotely yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuizMetadata {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_url: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub creator_id: i64,
    #[serde(default)]
    pub time_limit_in_mins: u32,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,
}

impl QuizMetadata {
    /// Whether the quiz already exists on the backend
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// Which control on the edit screen opened the metadata form.
///
/// Decides between updating an existing quiz and creating a new one, and is
/// carried forward into the question forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateQuizOrigin {
    /// A quiz row was selected in the table (update in place)
    Table,
    /// The "Create" button was pressed (new quiz)
    CreateButton,
}

impl CreateQuizOrigin {
    pub fn is_update(&self) -> bool {
        matches!(self, CreateQuizOrigin::Table)
    }
}

/// Category record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// User record, reduced to what the client needs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub user_name: String,
}

/// Denormalized quiz listing row with resolved category and creator names.
///
/// Only used for selection; the raw ids are kept so a selected row can be
/// turned back into [`QuizMetadata`] without another lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub content_url: String,
    pub category_id: i64,
    pub category: String,
    pub creator_id: i64,
    pub creator: String,
    pub time_limit_in_mins: u32,
    pub is_active: bool,
    pub question_count: u32,
}

impl QuizRow {
    /// Column headers with their display widths
    pub const COLUMNS: [(&'static str, u16); 9] = [
        ("ID", 7),
        ("Title", 20),
        ("Description", 30),
        ("Content URL(Tiny)", 38),
        ("Category", 20),
        ("Creator", 20),
        ("Time Limit(Mins)", 17),
        ("Is Active", 10),
        ("Questions Count", 15),
    ];

    /// Build a row from a quiz and its resolved names
    pub fn from_quiz(quiz: &QuizMetadata, category: String, creator: String) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            content_url: quiz.content_url.clone(),
            category_id: quiz.category_id,
            category,
            creator_id: quiz.creator_id,
            creator,
            time_limit_in_mins: quiz.time_limit_in_mins,
            is_active: quiz.is_active,
            question_count: quiz.question_count,
        }
    }

    /// Table cells in column order
    pub fn cells(&self) -> [String; 9] {
        [
            self.id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.content_url.clone(),
            self.category.clone(),
            self.creator.clone(),
            self.time_limit_in_mins.to_string(),
            self.is_active.to_string(),
            self.question_count.to_string(),
        ]
    }

    /// Derive fresh metadata for editing
    pub fn to_metadata(&self) -> QuizMetadata {
        QuizMetadata {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            content_url: self.content_url.clone(),
            category_id: self.category_id,
            creator_id: self.creator_id,
            time_limit_in_mins: self.time_limit_in_mins,
            question_count: self.question_count,
            is_active: self.is_active,
            creation_date: None,
            last_modified_date: None,
        }
    }
}
