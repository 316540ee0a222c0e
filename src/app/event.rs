//! Messages flowing through the session.
//!
//! Terminal input and completed backend work both arrive as [`AppEvent`]s.
//! Screens answer with [`Effect`]s: either a state change the session
//! applies itself, or a [`Command`] the runtime executes off the UI loop.

use crate::app::screens::questions::sync::{SyncReport, SyncRequest};
use crate::models::{Answer, CreateQuizOrigin, Question, QuizMetadata, QuizRow};
use crossterm::event::{KeyEvent, MouseEvent};

/// Everything the session reacts to
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Periodic tick driving the banner animation
    Tick,
    Network(NetworkEvent),
}

/// Result of a finished [`Command`]
#[derive(Debug)]
pub enum NetworkEvent {
    QuizzesLoaded(crate::Result<Vec<QuizRow>>),
    CategoryNamesLoaded(crate::Result<Vec<String>>),
    QuizMetadataSubmitted(crate::Result<MetadataSubmission>),
    QuestionsLoaded {
        quiz_id: i64,
        result: crate::Result<Vec<(Question, Vec<Answer>)>>,
    },
    QuestionsSynced(SyncReport),
}

/// Outcome of submitting the metadata form.
///
/// A category lookup failure is an `Err` and keeps the operator on the
/// form; a failed create or update only sets `warning`.
#[derive(Debug, Clone)]
pub struct MetadataSubmission {
    pub quiz: QuizMetadata,
    pub warning: Option<String>,
}

/// Backend work requested by a screen
#[derive(Debug, Clone)]
pub enum Command {
    FetchQuizzes,
    LoadCategoryNames,
    SubmitQuizMetadata {
        quiz: QuizMetadata,
        category_name: String,
        origin: CreateQuizOrigin,
        creator_name: Option<String>,
    },
    LoadQuestions {
        quiz_id: i64,
    },
    SyncQuestions(SyncRequest),
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::FetchQuizzes => "fetch_quizzes",
            Command::LoadCategoryNames => "load_category_names",
            Command::SubmitQuizMetadata { .. } => "submit_quiz_metadata",
            Command::LoadQuestions { .. } => "load_questions",
            Command::SyncQuestions(_) => "sync_questions",
        }
    }
}

/// Screen-to-session transitions
#[derive(Debug, Clone)]
pub enum Completion {
    /// An SSO choice was made on the login screen
    LoggedIn,
    /// "Create/Edit Questionnaire" was chosen from the menu
    OpenQuestionnaireEditor,
    /// A quiz row or the "Create" button was chosen
    EditQuiz {
        row: Option<QuizRow>,
        origin: CreateQuizOrigin,
    },
    /// Metadata was accepted (and persisted, unless `warning` is set)
    MetadataCompleted {
        quiz: QuizMetadata,
        origin: CreateQuizOrigin,
        warning: Option<String>,
    },
    /// The last question form was finished
    QuestionsCompleted,
}

/// What a screen asks of the session after handling an event
#[derive(Debug, Clone)]
pub enum Effect {
    Command(Command),
    Complete(Completion),
    Quit,
}
