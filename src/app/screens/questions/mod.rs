//! Dynamic question forms
//!
//! One form per question slot; the number of slots comes from the quiz's
//! question count and never changes. Ctrl+Right saves the current slot,
//! syncs every non-blank slot and moves on; Ctrl+Left saves and moves back
//! without syncing. Only one sync runs at a time, later requests queue.

pub mod slot;
pub mod sync;

use super::help_line;
use crate::app::event::{AppEvent, Command, Completion, Effect, NetworkEvent};
use crate::app::state::{key_to_navigation, NavigationAction};
use crate::error::user_friendly_message;
use crate::models::{Answer, CreateQuizOrigin, Question, QuizMetadata};
use crate::AppError;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub use slot::QuestionSlot;
pub use sync::{sync_questions, SlotOutcome, SlotSnapshot, SyncReport, SyncRequest};

pub const FOOTER: &str =
    "Press Ctrl+Right Arrow to proceed, Ctrl+Left Arrow to go back, Esc to quit.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

#[derive(Debug)]
pub struct DynamicQuestionsScreen {
    quiz_id: i64,
    origin: CreateQuizOrigin,
    slots: Vec<QuestionSlot>,
    cursor: usize,
    quiz_exists: Option<bool>,
    generation: u64,
    in_flight: Option<u64>,
    resync_queued: bool,
    finishing: bool,
    status: Option<StatusLine>,
}

impl DynamicQuestionsScreen {
    /// One empty slot per question of `quiz`; `warning` is shown until the
    /// first sync reports back
    pub fn new(quiz: &QuizMetadata, origin: CreateQuizOrigin, warning: Option<String>) -> Self {
        // A quiz always has at least one question slot
        let count = (quiz.question_count as usize).max(1);
        Self {
            quiz_id: quiz.id,
            origin,
            slots: (0..count).map(|i| QuestionSlot::empty(i, quiz.id)).collect(),
            cursor: 0,
            quiz_exists: None,
            generation: 0,
            in_flight: None,
            resync_queued: false,
            finishing: false,
            status: warning.map(StatusLine::Error),
        }
    }

    /// Prefetch questions of a quiz that exists remotely
    pub fn init(&mut self) -> Vec<Effect> {
        if self.quiz_id > 0 {
            vec![Effect::Command(Command::LoadQuestions {
                quiz_id: self.quiz_id,
            })]
        } else {
            Vec::new()
        }
    }

    pub fn quiz_id(&self) -> i64 {
        self.quiz_id
    }

    pub fn origin(&self) -> CreateQuizOrigin {
        self.origin
    }

    pub fn slots(&self) -> &[QuestionSlot] {
        &self.slots
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut QuestionSlot> {
        self.slots.get_mut(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &QuestionSlot {
        &self.slots[self.cursor]
    }

    pub fn current_mut(&mut self) -> &mut QuestionSlot {
        &mut self.slots[self.cursor]
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn quiz_exists(&self) -> Option<bool> {
        self.quiz_exists
    }

    fn is_last(&self) -> bool {
        self.cursor + 1 == self.slots.len()
    }

    pub fn handle_event(&mut self, event: &AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Network(NetworkEvent::QuestionsLoaded { quiz_id, result })
                if *quiz_id == self.quiz_id =>
            {
                self.apply_prefetch(result);
                Vec::new()
            }
            AppEvent::Network(NetworkEvent::QuestionsSynced(report)) => self.apply_report(report),
            AppEvent::Key(_) if self.finishing => Vec::new(),
            AppEvent::Key(key) => match key_to_navigation(*key) {
                NavigationAction::Advance => self.advance(),
                NavigationAction::Retreat => {
                    self.retreat();
                    Vec::new()
                }
                NavigationAction::Retry => {
                    self.save_current();
                    self.request_sync()
                }
                NavigationAction::Select if self.is_last() && self.current().is_completed() => {
                    self.save_current();
                    let effects = self.request_sync();
                    self.finish(effects)
                }
                _ => {
                    self.current_mut().handle_key(*key);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    fn save_current(&mut self) {
        self.current_mut().save();
    }

    /// Save, sync and move to the next slot; at the last slot a completed
    /// form finishes the quiz
    pub fn advance(&mut self) -> Vec<Effect> {
        self.save_current();
        let effects = self.request_sync();
        if !self.is_last() {
            self.cursor += 1;
            effects
        } else if self.current().is_completed() {
            self.finish(effects)
        } else {
            tracing::info!(slot = self.cursor, "Already at the last question");
            effects
        }
    }

    /// Save and move to the previous slot without syncing
    pub fn retreat(&mut self) {
        self.save_current();
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn finish(&mut self, mut effects: Vec<Effect>) -> Vec<Effect> {
        self.finishing = true;
        if self.in_flight.is_none() {
            effects.push(Effect::Complete(Completion::QuestionsCompleted));
        }
        effects
    }

    fn request_sync(&mut self) -> Vec<Effect> {
        if self.in_flight.is_some() {
            self.resync_queued = true;
            return Vec::new();
        }
        let slots: Vec<SlotSnapshot> = self
            .slots
            .iter()
            .filter(|slot| !slot.is_blank())
            .map(QuestionSlot::snapshot)
            .collect();
        if slots.is_empty() {
            return Vec::new();
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        tracing::info!(quiz_id = self.quiz_id, generation = self.generation, slots = slots.len(), "Syncing questions");
        vec![Effect::Command(Command::SyncQuestions(SyncRequest {
            generation: self.generation,
            quiz_id: self.quiz_id,
            quiz_exists: self.quiz_exists,
            slots,
        }))]
    }

    fn apply_report(&mut self, report: &SyncReport) -> Vec<Effect> {
        if report.quiz_id != self.quiz_id || Some(report.generation) != self.in_flight {
            tracing::debug!(generation = report.generation, "Dropping stale sync report");
            return Vec::new();
        }
        self.in_flight = None;
        if report.quiz_exists.is_some() {
            self.quiz_exists = report.quiz_exists;
        }
        for outcome in &report.slots {
            if let Some(slot) = self.slots.get_mut(outcome.index) {
                slot.apply_sync(outcome.question_id, &outcome.answer_ids);
            }
        }

        self.status = Some(if report.is_clean() {
            StatusLine::Info(format!("Saved {} question(s)", report.slots.len()))
        } else {
            StatusLine::Error(format!(
                "{} save(s) failed, press Ctrl+R to retry. {}",
                report.errors.len(),
                report.errors[0]
            ))
        });

        let mut effects = Vec::new();
        if self.resync_queued {
            self.resync_queued = false;
            effects = self.request_sync();
        }
        if self.finishing && self.in_flight.is_none() {
            effects.push(Effect::Complete(Completion::QuestionsCompleted));
        }
        effects
    }

    fn apply_prefetch(&mut self, result: &crate::Result<Vec<(Question, Vec<Answer>)>>) {
        match result {
            Ok(entries) => {
                self.quiz_exists = Some(true);
                let mut filled = 0;
                for (index, (question, answers)) in entries.iter().enumerate().take(self.slots.len()) {
                    if !self.slots[index].is_edited() {
                        self.slots[index] =
                            QuestionSlot::from_remote(index, question.clone(), answers.clone());
                        filled += 1;
                    }
                }
                tracing::info!(quiz_id = self.quiz_id, fetched = entries.len(), filled, "Prefilled questions");
            }
            Err(AppError::NotFound(_)) => {
                self.quiz_exists = Some(false);
            }
            Err(err) => {
                tracing::error!(quiz_id = self.quiz_id, error = %err, "Failed to load questions");
                self.status = Some(StatusLine::Error(user_friendly_message(err)));
            }
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        let mut header = vec![Span::styled(
            format!("Question {} of {}", self.cursor + 1, self.slots.len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if self.current().question().id > 0 {
            header.push(Span::styled(
                format!("  (#{})", self.current().question().id),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.is_syncing() {
            header.push(Span::styled("  saving...", Style::default().fg(Color::DarkGray)));
        }
        f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

        let title = if self.current().is_completed() {
            "Question (done)"
        } else {
            "Question"
        };
        self.current().form().render(f, chunks[1], title);

        let status = match &self.status {
            Some(StatusLine::Info(text)) => {
                Paragraph::new(text.as_str()).style(Style::default().fg(Color::Green))
            }
            Some(StatusLine::Error(text)) => {
                Paragraph::new(text.as_str()).style(Style::default().fg(Color::Red))
            }
            None => Paragraph::new(""),
        };
        f.render_widget(status, chunks[2]);
        f.render_widget(
            Paragraph::new(FOOTER).alignment(Alignment::Center),
            chunks[3],
        );
        f.render_widget(
            Paragraph::new(help_line(&[("Ctrl+R", "Retry save"), ("Alt+End", "Mute/unmute")]))
                .alignment(Alignment::Center),
            chunks[4],
        );
    }
}
