//! Yes/no confirmation overlay shown before leaving the application.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub const EXIT_PROMPT: &str = "Do you really want to exit? (y/n)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DialogState {
    #[default]
    Inactive,
    Active,
}

/// Two-state confirmation dialog
#[derive(Debug, Clone)]
pub struct ConfirmationDialog {
    state: DialogState,
    prompt: String,
    yes: char,
    no: char,
}

impl Default for ConfirmationDialog {
    fn default() -> Self {
        Self::new(EXIT_PROMPT, 'y', 'n')
    }
}

impl ConfirmationDialog {
    pub fn new(prompt: &str, yes: char, no: char) -> Self {
        Self {
            state: DialogState::Inactive,
            prompt: prompt.to_string(),
            yes,
            no,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == DialogState::Active
    }

    pub fn activate(&mut self) {
        self.state = DialogState::Active;
    }

    /// Feed a key to the dialog.
    ///
    /// Returns `(handled, confirmed)`. Only the yes/no keys are handled and
    /// close it; any other key leaves it open and reports `(false, false)`.
    pub fn update(&mut self, key: KeyEvent) -> (bool, bool) {
        if !self.is_active() {
            return (false, false);
        }
        match key.code {
            KeyCode::Char(c) if c == self.yes => {
                self.state = DialogState::Inactive;
                (true, true)
            }
            KeyCode::Char(c) if c == self.no => {
                self.state = DialogState::Inactive;
                (true, false)
            }
            _ => (false, false),
        }
    }

    /// Prompt text, empty while inactive
    pub fn view(&self) -> &str {
        if self.is_active() {
            &self.prompt
        } else {
            ""
        }
    }

    /// Draw the prompt centered over `area`
    pub fn render(&self, f: &mut Frame, area: Rect) {
        if !self.is_active() {
            return;
        }
        let popup = centered_rect(area, self.prompt.len() as u16 + 6, 5);
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.prompt.as_str(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Confirm"));
        f.render_widget(Clear, popup);
        f.render_widget(paragraph, popup);
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
