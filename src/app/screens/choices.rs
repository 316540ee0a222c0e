//! Cursor-driven choice list and the animated banner shared by the login
//! and menu screens.

use crate::app::state::Viewport;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// A fixed list of labels with a clamped cursor and mouse hit areas
#[derive(Debug, Clone)]
pub struct ChoiceList {
    choices: &'static [&'static str],
    cursor: usize,
    direction: Direction,
    hit_areas: Vec<Rect>,
    laid_out_for: Option<Viewport>,
}

impl ChoiceList {
    pub fn new(choices: &'static [&'static str], direction: Direction) -> Self {
        Self {
            choices,
            cursor: 0,
            direction,
            hit_areas: Vec::new(),
            laid_out_for: None,
        }
    }

    pub fn choices(&self) -> &'static [&'static str] {
        self.choices
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.choices.get(self.cursor).copied()
    }

    /// Move the cursor back, stopping at the first choice
    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor forward, stopping at the last choice
    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.choices.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to `index`, ignoring indexes past the last choice
    pub fn select(&mut self, index: usize) {
        if index < self.choices.len() {
            self.cursor = index;
        }
    }

    /// Forget hit areas laid out for a different window size; they come
    /// back on the next draw
    pub fn resize(&mut self, viewport: Viewport) {
        if self.laid_out_for != Some(viewport) {
            self.hit_areas.clear();
            self.laid_out_for = None;
        }
    }

    /// Window size the hit areas were last computed for
    pub fn laid_out_for(&self) -> Option<Viewport> {
        self.laid_out_for
    }

    pub fn hit_areas(&self) -> &[Rect] {
        &self.hit_areas
    }

    /// Index of the choice whose button contains the cell, if any
    pub fn hit_test(&self, column: u16, row: u16) -> Option<usize> {
        self.hit_areas.iter().position(|rect| {
            column >= rect.x
                && column < rect.x + rect.width
                && row >= rect.y
                && row < rect.y + rect.height
        })
    }

    /// Compute button rectangles inside `area` and remember them for
    /// hit-testing under `viewport`
    pub fn layout(&mut self, area: Rect, viewport: Viewport) -> Vec<Rect> {
        let count = self.choices.len().max(1) as u32;
        let constraints: Vec<Constraint> = self
            .choices
            .iter()
            .map(|_| Constraint::Ratio(1, count))
            .collect();
        let cells = Layout::default()
            .direction(self.direction.clone())
            .constraints(constraints)
            .split(area);

        let (max_width, height) = match self.direction {
            Direction::Horizontal => (28, 3),
            Direction::Vertical => (42, 3),
        };
        self.hit_areas = cells
            .iter()
            .map(|cell| {
                let width = max_width.min(cell.width);
                let height = height.min(cell.height);
                Rect::new(
                    cell.x + (cell.width - width) / 2,
                    cell.y + (cell.height - height) / 2,
                    width,
                    height,
                )
            })
            .collect();
        self.laid_out_for = Some(viewport);
        self.hit_areas.clone()
    }

    /// Draw every choice as a bordered button, highlighting the cursor
    pub fn render(&mut self, f: &mut Frame, area: Rect, viewport: Viewport) {
        let buttons = self.layout(area, viewport);
        for (index, (label, rect)) in self.choices.iter().zip(buttons).enumerate() {
            let style = if index == self.cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let button = Paragraph::new(*label)
                .style(style)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::Cyan)),
                );
            f.render_widget(button, rect);
        }
    }
}

const FRAMES: [&str; 4] = [
    r"  _        _       ___       _
 | |   ___| |_ ___/ _ \ _  _(_)___
 | |__/ -_)  _(_-< (_) | || | |_ /
 |____\___|\__/__/\__\_\\_,_|_/__|
  *",
    r"  _        _       ___       _
 | |   ___| |_ ___/ _ \ _  _(_)___
 | |__/ -_)  _(_-< (_) | || | |_ /
 |____\___|\__/__/\__\_\\_,_|_/__|
            *",
    r"  _        _       ___       _
 | |   ___| |_ ___/ _ \ _  _(_)___
 | |__/ -_)  _(_-< (_) | || | |_ /
 |____\___|\__/__/\__\_\\_,_|_/__|
                      *",
    r"  _        _       ___       _
 | |   ___| |_ ___/ _ \ _  _(_)___
 | |__/ -_)  _(_-< (_) | || | |_ /
 |____\___|\__/__/\__\_\\_,_|_/__|
                                *",
];

/// Title art advanced one frame per tick
#[derive(Debug, Clone, Default)]
pub struct Banner {
    frame: usize,
}

impl Banner {
    pub const HEIGHT: u16 = 5;

    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn current(&self) -> &'static str {
        FRAMES[self.frame]
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let banner = Paragraph::new(self.current())
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(banner, area);
    }
}
