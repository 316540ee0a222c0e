//! Login screen
//!
//! Two SSO choices laid out side by side under the animated banner.

use super::choices::{Banner, ChoiceList};
use super::help_line;
use crate::app::event::{AppEvent, Completion, Effect};
use crate::app::state::{key_to_navigation, NavigationAction, Viewport};
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

pub const LOGIN_CHOICES: &[&str] = &["Login via SSO", "Signup via SSO"];

#[derive(Debug)]
pub struct LoginScreen {
    choices: ChoiceList,
    banner: Banner,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            choices: ChoiceList::new(LOGIN_CHOICES, Direction::Horizontal),
            banner: Banner::default(),
        }
    }

    pub fn choices(&self) -> &ChoiceList {
        &self.choices
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Tick => {
                self.banner.tick();
                Vec::new()
            }
            AppEvent::Key(key) => match key_to_navigation(*key) {
                NavigationAction::Left => {
                    self.choices.select_previous();
                    Vec::new()
                }
                NavigationAction::Right => {
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
        match LOGIN_CHOICES.get(index) {
            Some(choice) => {
                tracing::info!(choice, "Login choice selected");
                vec![Effect::Complete(Completion::LoggedIn)]
            }
            None => vec![Effect::Quit],
        }
    }

    pub fn render(&mut self, f: &mut Frame, viewport: Viewport) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(Banner::HEIGHT),
                Constraint::Length(2),
                Constraint::Length(5),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.banner.render(f, chunks[1]);
        let subtitle = Paragraph::new("Terminal quiz authoring").alignment(Alignment::Center);
        f.render_widget(subtitle, chunks[2]);
        self.choices.render(f, chunks[3], viewport);
        f.render_widget(
            Paragraph::new(help_line(&[
                ("←→", "Choose"),
                ("Enter", "Select"),
                ("Esc", "Quit"),
                ("Alt+End", "Mute/unmute"),
            ]))
            .alignment(Alignment::Center),
            chunks[5],
        );
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}
