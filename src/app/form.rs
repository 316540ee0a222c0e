//! Field-by-field form engine.
//!
//! A [`Form`] owns an ordered list of [`Field`]s and a focus cursor. Enter
//! and Tab move forward after validating the focused field; Enter on the
//! last field validates everything and completes the form. Values are
//! stored per field, so a form kept alive across screens keeps its input.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Checks a field value; may look at other fields of the same form
pub type Validator = fn(&str, &Form) -> std::result::Result<(), String>;

/// Rejects empty values
pub fn required(value: &str, _form: &Form) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err("This field is required".to_string())
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Input {
        value: String,
        suggestions: Vec<String>,
    },
    Select {
        options: Vec<SelectOption>,
        selected: usize,
    },
    Confirm {
        affirmative: String,
        negative: String,
        value: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Field {
    key: &'static str,
    title: String,
    description: String,
    kind: FieldKind,
    validator: Option<Validator>,
    error: Option<String>,
}

impl Field {
    fn with_kind(key: &'static str, title: &str, kind: FieldKind) -> Self {
        Self {
            key,
            title: title.to_string(),
            description: String::new(),
            kind,
            validator: None,
            error: None,
        }
    }

    /// Free text input
    pub fn input(key: &'static str, title: &str) -> Self {
        Self::with_kind(
            key,
            title,
            FieldKind::Input {
                value: String::new(),
                suggestions: Vec::new(),
            },
        )
    }

    /// Pick one of `(label, value)` options; the first is preselected
    pub fn select(key: &'static str, title: &str, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(label, value)| SelectOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();
        Self::with_kind(key, title, FieldKind::Select { options, selected: 0 })
    }

    /// Two-button confirmation, initially on the negative answer
    pub fn confirm(key: &'static str, title: &str, affirmative: &str, negative: &str) -> Self {
        Self::with_kind(
            key,
            title,
            FieldKind::Confirm {
                affirmative: affirmative.to_string(),
                negative: negative.to_string(),
                value: false,
            },
        )
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn suggestions(mut self, suggestions: Vec<String>) -> Self {
        if let FieldKind::Input { suggestions: s, .. } = &mut self.kind {
            *s = suggestions;
        }
        self
    }

    /// Prefill the value
    pub fn value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current value as text; confirms read `"true"`/`"false"`
    pub fn current_value(&self) -> String {
        match &self.kind {
            FieldKind::Input { value, .. } => value.clone(),
            FieldKind::Select { options, selected } => options
                .get(*selected)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            FieldKind::Confirm { value, .. } => value.to_string(),
        }
    }

    fn set_value(&mut self, new_value: &str) {
        match &mut self.kind {
            FieldKind::Input { value, .. } => *value = new_value.to_string(),
            FieldKind::Select { options, selected } => {
                if let Some(index) = options.iter().position(|o| o.value == new_value) {
                    *selected = index;
                }
            }
            FieldKind::Confirm { value, .. } => *value = new_value == "true",
        }
    }

    /// First suggestion extending the typed prefix
    fn suggestion(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Input { value, suggestions } if !value.is_empty() => suggestions
                .iter()
                .find(|s| s.len() > value.len() && s.to_lowercase().starts_with(&value.to_lowercase()))
                .map(String::as_str),
            _ => None,
        }
    }

    fn edit(&mut self, code: KeyCode) -> bool {
        let changed = match &mut self.kind {
            FieldKind::Input { value, .. } => match code {
                KeyCode::Char(c) => {
                    value.push(c);
                    true
                }
                KeyCode::Backspace => value.pop().is_some(),
                _ => false,
            },
            FieldKind::Select { options, selected } => {
                let len = options.len();
                if len == 0 {
                    return false;
                }
                match code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        *selected = (*selected + len - 1) % len;
                        true
                    }
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                        *selected = (*selected + 1) % len;
                        true
                    }
                    _ => false,
                }
            }
            FieldKind::Confirm { value, .. } => match code {
                KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                    *value = !*value;
                    true
                }
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    *value = true;
                    true
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    *value = false;
                    true
                }
                _ => false,
            },
        };
        if changed {
            self.error = None;
        }
        changed
    }

    fn value_spans(&self, focused: bool) -> Vec<Span<'_>> {
        let selected_style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.kind {
            FieldKind::Input { value, .. } => {
                let mut spans = vec![Span::raw(value.as_str())];
                if focused {
                    if let Some(suggestion) = self.suggestion() {
                        spans.push(Span::styled(
                            suggestion.get(value.len()..).unwrap_or_default().to_string(),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
                }
                spans
            }
            FieldKind::Select { options, selected } => options
                .iter()
                .enumerate()
                .flat_map(|(i, option)| {
                    let style = if i == *selected {
                        selected_style
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    [
                        Span::styled(format!(" {} ", option.label), style),
                        Span::raw(" "),
                    ]
                })
                .collect(),
            FieldKind::Confirm {
                affirmative,
                negative,
                value,
            } => {
                let (yes_style, no_style) = if *value {
                    (selected_style, Style::default().fg(Color::Gray))
                } else {
                    (Style::default().fg(Color::Gray), selected_style)
                };
                vec![
                    Span::styled(format!(" {} ", affirmative), yes_style),
                    Span::raw("  "),
                    Span::styled(format!(" {} ", negative), no_style),
                ]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
    state: FormState,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            focus: 0,
            state: FormState::Editing,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_key(&self) -> Option<&'static str> {
        self.fields.get(self.focus).map(Field::key)
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == FormState::Completed
    }

    /// Return a completed form to editing, keeping its values
    pub fn reopen(&mut self) {
        self.state = FormState::Editing;
    }

    /// Value of `key`, empty if there is no such field
    pub fn get(&self, key: &str) -> String {
        self.field(key).map(Field::current_value).unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.set_value(value);
        }
    }

    pub fn set_suggestions(&mut self, key: &str, suggestions: Vec<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            if let FieldKind::Input { suggestions: s, .. } = &mut field.kind {
                *s = suggestions;
            }
        }
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Field::error)
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Handle a key press. Returns whether a field value changed.
    ///
    /// Ctrl and Alt chords are left to the caller. A completed form ignores
    /// Enter and reopens on any other key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press
            || key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            || self.fields.is_empty()
        {
            return false;
        }
        if self.is_completed() {
            if key.code == KeyCode::Enter {
                return false;
            }
            self.reopen();
        }

        match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.focus.saturating_sub(1);
                false
            }
            KeyCode::Tab if self.accept_suggestion() => true,
            KeyCode::Down | KeyCode::Tab => {
                self.advance_focus();
                false
            }
            KeyCode::Enter => {
                if self.focus + 1 < self.fields.len() {
                    self.advance_focus();
                } else {
                    self.submit();
                }
                false
            }
            code => self.fields[self.focus].edit(code),
        }
    }

    fn accept_suggestion(&mut self) -> bool {
        let field = &mut self.fields[self.focus];
        let suggestion = field.suggestion().map(str::to_string);
        match suggestion {
            Some(suggestion) => {
                field.set_value(&suggestion);
                field.error = None;
                true
            }
            None => false,
        }
    }

    fn advance_focus(&mut self) {
        if self.validate_at(self.focus) && self.focus + 1 < self.fields.len() {
            self.focus += 1;
        }
    }

    /// Validate every field; focus the first invalid one or complete
    fn submit(&mut self) {
        for index in 0..self.fields.len() {
            if !self.validate_at(index) {
                self.focus = index;
                return;
            }
        }
        self.state = FormState::Completed;
    }

    fn validate_at(&mut self, index: usize) -> bool {
        let Some(validator) = self.fields[index].validator else {
            return true;
        };
        let value = self.fields[index].current_value();
        let outcome = validator(&value, self);
        let field = &mut self.fields[index];
        field.error = outcome.err();
        field.error.is_none()
    }

    /// Draw the fields inside a bordered block, scrolled so the focused
    /// field stays visible
    pub fn render(&self, f: &mut Frame, area: Rect, title: &str) {
        let mut lines = Vec::new();
        let mut focus_line = 0;
        for (index, field) in self.fields.iter().enumerate() {
            let focused = index == self.focus && !self.is_completed();
            if index == self.focus {
                focus_line = lines.len();
            }
            let marker = if focused {
                Span::styled("┃ ", Style::default().fg(Color::Cyan))
            } else {
                Span::raw("  ")
            };
            let title_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            lines.push(Line::from(vec![
                marker.clone(),
                Span::styled(field.title.as_str(), title_style),
            ]));
            if !field.description.is_empty() {
                lines.push(Line::from(vec![
                    marker.clone(),
                    Span::styled(field.description.as_str(), Style::default().fg(Color::DarkGray)),
                ]));
            }
            let mut value = vec![marker.clone()];
            value.extend(field.value_spans(focused));
            lines.push(Line::from(value));
            if let Some(error) = &field.error {
                lines.push(Line::from(vec![
                    marker,
                    Span::styled(format!("* {}", error), Style::default().fg(Color::Red)),
                ]));
            }
            lines.push(Line::from(""));
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let scroll = (focus_line + 4).saturating_sub(inner_height) as u16;
        let paragraph = Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(paragraph, area);
    }
}
