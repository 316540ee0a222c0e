//! Quiz table with a "Create" button.
//!
//! The listing is fetched when the screen opens. Tab moves focus between
//! the table and the button; Enter on a row edits that quiz, Enter on the
//! button starts a new one.

use super::help_line;
use crate::app::event::{AppEvent, Command, Completion, Effect, NetworkEvent};
use crate::app::state::{key_to_navigation, NavigationAction};
use crate::error::user_friendly_message;
use crate::models::{CreateQuizOrigin, QuizRow};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    CreateButton,
}

#[derive(Debug)]
pub struct EditQuestionnaireScreen {
    quizzes: Vec<QuizRow>,
    table_state: TableState,
    focus: Focus,
    loading: bool,
    error: Option<String>,
}

impl EditQuestionnaireScreen {
    pub fn new() -> Self {
        Self {
            quizzes: Vec::new(),
            table_state: TableState::default(),
            focus: Focus::CreateButton,
            loading: false,
            error: None,
        }
    }

    /// Request the quiz listing
    pub fn init(&mut self) -> Vec<Effect> {
        self.loading = true;
        vec![Effect::Command(Command::FetchQuizzes)]
    }

    pub fn quizzes(&self) -> &[QuizRow] {
        &self.quizzes
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Network(NetworkEvent::QuizzesLoaded(result)) => {
                self.loading = false;
                match result {
                    Ok(rows) => self.set_quizzes(rows.clone()),
                    Err(err) => {
                        tracing::error!(error = %err, "Failed to fetch quizzes");
                        self.error = Some(user_friendly_message(err));
                    }
                }
                Vec::new()
            }
            AppEvent::Key(key) => match key_to_navigation(*key) {
                NavigationAction::Next | NavigationAction::Previous => {
                    self.toggle_focus();
                    Vec::new()
                }
                NavigationAction::Up if self.focus == Focus::Table => {
                    self.select_previous();
                    Vec::new()
                }
                NavigationAction::Down if self.focus == Focus::Table => {
                    self.select_next();
                    Vec::new()
                }
                NavigationAction::Select => self.commit(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn set_quizzes(&mut self, rows: Vec<QuizRow>) {
        tracing::info!(count = rows.len(), "Quiz listing loaded");
        self.quizzes = rows;
        self.error = None;
        self.table_state
            .select(if self.quizzes.is_empty() { None } else { Some(0) });
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Table => Focus::CreateButton,
            Focus::CreateButton if !self.quizzes.is_empty() => Focus::Table,
            Focus::CreateButton => Focus::CreateButton,
        };
    }

    fn select_previous(&mut self) {
        if let Some(index) = self.table_state.selected() {
            self.table_state.select(Some(index.saturating_sub(1)));
        }
    }

    fn select_next(&mut self) {
        if let Some(index) = self.table_state.selected() {
            if index + 1 < self.quizzes.len() {
                self.table_state.select(Some(index + 1));
            }
        }
    }

    fn commit(&self) -> Vec<Effect> {
        match self.focus {
            Focus::CreateButton => vec![Effect::Complete(Completion::EditQuiz {
                row: None,
                origin: CreateQuizOrigin::CreateButton,
            })],
            Focus::Table => match self.table_state.selected().and_then(|i| self.quizzes.get(i)) {
                Some(row) => {
                    tracing::info!(quiz_id = row.id, "Editing quiz");
                    vec![Effect::Complete(Completion::EditQuiz {
                        row: Some(row.clone()),
                        origin: CreateQuizOrigin::Table,
                    })]
                }
                None => Vec::new(),
            },
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.render_table(f, chunks[0]);
        self.render_button(f, chunks[1]);

        let status = if self.loading {
            Paragraph::new("Loading quizzes...").style(Style::default().fg(Color::DarkGray))
        } else if let Some(error) = &self.error {
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new(format!("{} quizzes", self.quizzes.len()))
                .style(Style::default().fg(Color::DarkGray))
        };
        f.render_widget(status.alignment(Alignment::Center), chunks[2]);

        f.render_widget(
            Paragraph::new(help_line(&[
                ("Tab", "Switch focus"),
                ("↑↓", "Navigate"),
                ("Enter", "Select"),
                ("Esc", "Quit"),
                ("Alt+End", "Mute/unmute"),
            ]))
            .alignment(Alignment::Center),
            chunks[3],
        );
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let header = Row::new(
            QuizRow::COLUMNS
                .iter()
                .map(|(title, _)| Cell::from(*title)),
        )
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let rows = self.quizzes.iter().map(|quiz| Row::new(quiz.cells()));
        let widths = QuizRow::COLUMNS.iter().map(|(_, width)| Constraint::Length(*width));

        let border = if self.focus == Focus::Table {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title("Quizzes"),
            )
            .highlight_style(Style::default().bg(Color::Cyan).fg(Color::Black))
            .highlight_symbol(">> ");
        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_button(&self, f: &mut Frame, area: Rect) {
        let style = if self.focus == Focus::CreateButton {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let width = 16.min(area.width);
        let button_area = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);
        let button = Paragraph::new("Create")
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
        f.render_widget(button, button_area);
    }
}

impl Default for EditQuestionnaireScreen {
    fn default() -> Self {
        Self::new()
    }
}
