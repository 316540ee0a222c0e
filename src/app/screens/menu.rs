//! Main menu
//!
//! Six vertically stacked choices. Only questionnaire editing is handled
//! by this client; "Exit" quits.

use super::choices::{Banner, ChoiceList};
use super::help_line;
use crate::app::event::{AppEvent, Completion, Effect};
use crate::app::state::{key_to_navigation, NavigationAction, Viewport};
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub const MENU_CHOICES: &[&str] = &[
    "Setup (for Admins Only)",
    "Select category & Start Quiz",
    "Create/Edit Questionnaire & Answers",
    "View Leaderboard score",
    "Submit Enhancement Request",
    "Exit",
];

const EDIT_CHOICE: usize = 2;
const EXIT_CHOICE: usize = 5;

#[derive(Debug)]
pub struct MenuScreen {
    choices: ChoiceList,
    banner: Banner,
    status: Option<String>,
}

impl MenuScreen {
    pub fn new() -> Self {
        Self {
            choices: ChoiceList::new(MENU_CHOICES, Direction::Vertical),
            banner: Banner::default(),
            status: None,
        }
    }

    pub fn choices(&self) -> &ChoiceList {
        &self.choices
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Tick => {
                self.banner.tick();
                Vec::new()
            }
            AppEvent::Key(key) => match key_to_navigation(*key) {
                NavigationAction::Up => {
                    self.choices.select_previous();
                    Vec::new()
                }
                NavigationAction::Down => {
                    self.choices.select_next();
                    Vec::new()
                }
                NavigationAction::Select => self.commit(self.choices.cursor()),
                _ => Vec::new(),
            },
            AppEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                match self.choices.hit_test(mouse.column, mouse.row) {
                    Some(index) => {
                        self.choices.select(index);
                        self.commit(index)
                    }
                    None => Vec::new(),
                }
            }
            AppEvent::Resize(width, height) => {
                self.choices.resize(Viewport::new(*width, *height));
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn commit(&mut self, index: usize) -> Vec<Effect> {
        match index {
            EDIT_CHOICE => vec![Effect::Complete(Completion::OpenQuestionnaireEditor)],
            EXIT_CHOICE => vec![Effect::Quit],
            _ => {
                let choice = MENU_CHOICES.get(index).copied().unwrap_or_default();
                tracing::info!(choice, "Menu choice not available");
                self.status = Some(format!("\"{}\" is not available in this client", choice));
                Vec::new()
            }
        }
    }

    pub fn render(&mut self, f: &mut Frame, viewport: Viewport) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(Banner::HEIGHT),
                Constraint::Min(MENU_CHOICES.len() as u16 * 3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.banner.render(f, chunks[1]);
        self.choices.render(f, chunks[2], viewport);
        if let Some(status) = &self.status {
            f.render_widget(
                Paragraph::new(status.as_str())
                    .style(Style::default().fg(Color::Yellow))
                    .alignment(Alignment::Center),
                chunks[3],
            );
        }
        f.render_widget(
            Paragraph::new(help_line(&[
                ("↑↓", "Navigate"),
                ("Enter", "Select"),
                ("Esc", "Quit"),
                ("Alt+End", "Mute/unmute"),
            ]))
            .alignment(Alignment::Center),
            chunks[4],
        );
    }
}

impl Default for MenuScreen {
    fn default() -> Self {
        Self::new()
    }
}
