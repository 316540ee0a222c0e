//! Quiz metadata form.
//!
//! On completion the form is turned into [`QuizMetadata`] and submitted:
//! the category name is resolved to an id, then the quiz is updated (row
//! selected in the table) or created (Create button). The screen only
//! completes once that submission reports back.

use super::help_line;
use crate::app::event::{AppEvent, Command, Completion, Effect, NetworkEvent};
use crate::app::form::{required, Field, Form};
use crate::error::user_friendly_message;
use crate::models::{CreateQuizOrigin, QuizMetadata, QuizRow};
use crate::util::{parse_trimmed, parse_yes_no, yes_no};
use crate::Result;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const CONTENT_URL: &str = "content_url";
pub const CATEGORY: &str = "category";
pub const TIME_LIMIT: &str = "time_limit";
pub const QUESTION_COUNT: &str = "question_count";
pub const ACTIVE: &str = "active";
pub const DONE: &str = "done";

fn time_limit(value: &str, form: &Form) -> std::result::Result<(), String> {
    required(value, form)?;
    parse_trimmed::<u32>("Time limit", value)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn question_count(value: &str, form: &Form) -> std::result::Result<(), String> {
    required(value, form)?;
    match parse_trimmed::<u32>("Question count", value) {
        Ok(0) => Err("You should have atleast a question in your Quiz.".to_string()),
        Ok(_) => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

fn done(value: &str, _form: &Form) -> std::result::Result<(), String> {
    if value == "true" {
        Ok(())
    } else {
        Err("Welp, finish up then".to_string())
    }
}

/// Build the metadata form, prefilled from `quiz` and its category name
pub fn metadata_form(quiz: &QuizMetadata, category: &str) -> Form {
    let number = |n: u32| if n == 0 { String::new() } else { n.to_string() };
    Form::new(vec![
        Field::input(TITLE, "Quiz Title")
            .value(&quiz.title)
            .validate_with(required),
        Field::input(DESCRIPTION, "Description").value(&quiz.description),
        Field::input(CONTENT_URL, "Content URL")
            .description("Tiny URL of the study material")
            .value(&quiz.content_url),
        Field::input(CATEGORY, "Category")
            .description("Tab completes a known category")
            .value(category)
            .validate_with(required),
        Field::input(TIME_LIMIT, "Time Limit (minutes)")
            .value(&number(quiz.time_limit_in_mins))
            .validate_with(time_limit),
        Field::input(QUESTION_COUNT, "Number of Questions")
            .value(&number(quiz.question_count))
            .validate_with(question_count),
        Field::select(ACTIVE, "Is Active?", &[("Yes", "Yes"), ("No", "No")])
            .value(yes_no(quiz.is_active)),
        Field::confirm(DONE, "All done?", "Yep", "Wait, no").validate_with(done),
    ])
}

#[derive(Debug)]
pub struct QuizMetadataScreen {
    form: Form,
    base: QuizMetadata,
    origin: CreateQuizOrigin,
    creator_name: Option<String>,
    submitting: bool,
    error: Option<String>,
}

impl QuizMetadataScreen {
    /// Form for `row` (editing) or a blank form (creating)
    pub fn new(row: Option<&QuizRow>, origin: CreateQuizOrigin, creator_name: Option<String>) -> Self {
        let (base, category) = match row {
            Some(row) => (row.to_metadata(), row.category.clone()),
            None => (QuizMetadata::default(), String::new()),
        };
        Self {
            form: metadata_form(&base, &category),
            base,
            origin,
            creator_name,
            submitting: false,
            error: None,
        }
    }

    /// Load category names for suggestions
    pub fn init(&mut self) -> Vec<Effect> {
        vec![Effect::Command(Command::LoadCategoryNames)]
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn origin(&self) -> CreateQuizOrigin {
        self.origin
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Quiz built from the current form values; the category id is left
    /// as it was and resolved on submission
    pub fn draft(&self) -> Result<QuizMetadata> {
        Ok(QuizMetadata {
            title: self.form.get(TITLE),
            description: self.form.get(DESCRIPTION),
            content_url: self.form.get(CONTENT_URL),
            time_limit_in_mins: parse_trimmed("Time limit", &self.form.get(TIME_LIMIT))?,
            question_count: parse_trimmed("Question count", &self.form.get(QUESTION_COUNT))?,
            is_active: parse_yes_no(&self.form.get(ACTIVE))?,
            ..self.base.clone()
        })
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Network(NetworkEvent::CategoryNamesLoaded(result)) => {
                match result {
                    Ok(names) => self.form.set_suggestions(CATEGORY, names.clone()),
                    Err(err) => tracing::warn!(error = %err, "Category suggestions unavailable"),
                }
                Vec::new()
            }
            AppEvent::Network(NetworkEvent::QuizMetadataSubmitted(result)) if self.submitting => {
                self.submitting = false;
                match result {
                    Ok(submission) => vec![Effect::Complete(Completion::MetadataCompleted {
                        quiz: submission.quiz.clone(),
                        origin: self.origin,
                        warning: submission.warning.clone(),
                    })],
                    Err(err) => {
                        tracing::error!(error = %err, "Quiz metadata rejected");
                        self.error = Some(user_friendly_message(err));
                        self.form.reopen();
                        Vec::new()
                    }
                }
            }
            AppEvent::Key(key) if !self.submitting => {
                let was_completed = self.form.is_completed();
                self.form.handle_key(*key);
                if !was_completed && self.form.is_completed() {
                    self.submit()
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        match self.draft() {
            Ok(quiz) => {
                self.submitting = true;
                self.error = None;
                let category_name = self.form.get(CATEGORY).trim().to_string();
                tracing::info!(title = %quiz.title, category = %category_name, origin = ?self.origin, "Submitting quiz metadata");
                vec![Effect::Command(Command::SubmitQuizMetadata {
                    quiz,
                    category_name,
                    origin: self.origin,
                    creator_name: self.creator_name.clone(),
                })]
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.form.reopen();
                Vec::new()
            }
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        let title = if self.origin.is_update() {
            "Edit Quiz"
        } else {
            "New Quiz"
        };
        self.form.render(f, chunks[0], title);

        let status = if self.submitting {
            Paragraph::new("Saving quiz...").style(Style::default().fg(Color::DarkGray))
        } else if let Some(error) = &self.error {
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        };
        f.render_widget(status.alignment(Alignment::Center), chunks[1]);
        f.render_widget(
            Paragraph::new(help_line(&[
                ("Enter", "Next"),
                ("↑", "Back"),
                ("Tab", "Complete"),
                ("Esc", "Quit"),
                ("Alt+End", "Mute/unmute"),
            ]))
            .alignment(Alignment::Center),
            chunks[2],
        );
    }
}
