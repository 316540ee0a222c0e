//! TUI screen components
//!
//! Each screen owns its state and exposes the same three operations:
//! `init` (effects to run when the screen becomes active), `handle_event`
//! and `render`. [`Screen`] is the closed set the session switches over.

pub mod choices;
pub mod edit_questionnaire;
pub mod login;
pub mod menu;
pub mod questions;
pub mod quiz_metadata;

pub use edit_questionnaire::EditQuestionnaireScreen;
pub use login::LoginScreen;
pub use menu::MenuScreen;
pub use questions::DynamicQuestionsScreen;
pub use quiz_metadata::QuizMetadataScreen;

use crate::app::event::{AppEvent, Effect};
use crate::app::state::{ScreenKind, Viewport};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// The active screen
#[derive(Debug)]
pub enum Screen {
    Login(LoginScreen),
    Menu(MenuScreen),
    EditQuestionnaire(EditQuestionnaireScreen),
    QuizMetadata(QuizMetadataScreen),
    DynamicQuestions(DynamicQuestionsScreen),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Login(_) => ScreenKind::Login,
            Screen::Menu(_) => ScreenKind::Menu,
            Screen::EditQuestionnaire(_) => ScreenKind::EditQuestionnaireList,
            Screen::QuizMetadata(_) => ScreenKind::QuizMetadataForm,
            Screen::DynamicQuestions(_) => ScreenKind::DynamicQuestionForms,
        }
    }

    pub fn init(&mut self) -> Vec<Effect> {
        match self {
            Screen::Login(_) | Screen::Menu(_) => Vec::new(),
            Screen::EditQuestionnaire(screen) => screen.init(),
            Screen::QuizMetadata(screen) => screen.init(),
            Screen::DynamicQuestions(screen) => screen.init(),
        }
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> Vec<Effect> {
        match self {
            Screen::Login(screen) => screen.handle_event(event),
            Screen::Menu(screen) => screen.handle_event(event),
            Screen::EditQuestionnaire(screen) => screen.handle_event(event),
            Screen::QuizMetadata(screen) => screen.handle_event(event),
            Screen::DynamicQuestions(screen) => screen.handle_event(event),
        }
    }

    pub fn render(&mut self, f: &mut Frame, viewport: Viewport) {
        match self {
            Screen::Login(screen) => screen.render(f, viewport),
            Screen::Menu(screen) => screen.render(f, viewport),
            Screen::EditQuestionnaire(screen) => screen.render(f),
            Screen::QuizMetadata(screen) => screen.render(f),
            Screen::DynamicQuestions(screen) => screen.render(f),
        }
    }
}

/// Key hints in the footer style: key in bold cyan, then its action
pub fn help_line(keys: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let spans: Vec<Span<'static>> = keys
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(key.to_string(), key_style),
                Span::raw(format!(" {}  ", action)),
            ]
        })
        .collect();
    Line::from(spans)
}
