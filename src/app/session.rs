//! Session controller.
//!
//! Owns the active screen, the window size, the confirmation dialog and the
//! audio flag. Every event goes through [`Session::dispatch`], one at a
//! time; screen transitions happen here and backend work is handed back to
//! the caller as [`Command`]s.

use crate::app::dialog::ConfirmationDialog;
use crate::app::event::{AppEvent, Command, Completion, Effect};
use crate::app::screens::{
    DynamicQuestionsScreen, EditQuestionnaireScreen, LoginScreen, MenuScreen, QuizMetadataScreen,
    Screen,
};
use crate::app::state::{is_global_key, key_to_navigation, NavigationAction, ScreenKind, Viewport};
use crate::audio::AudioControl;
use crate::config::AppConfig;
use ratatui::Frame;

/// Session behaviour taken from the configuration
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Ask before quitting on Esc
    pub confirm_exit: bool,
    /// Operator recorded as creator of new quizzes
    pub creator_name: Option<String>,
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            confirm_exit: config.confirm_exit,
            creator_name: config.creator_name.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    screen: Screen,
    viewport: Viewport,
    dialog: ConfirmationDialog,
    audio: AudioControl,
    options: SessionOptions,
    should_quit: bool,
}

impl Session {
    /// A session on the login screen
    pub fn new(options: SessionOptions, audio: AudioControl) -> Self {
        Self {
            screen: Screen::Login(LoginScreen::new()),
            viewport: Viewport::default(),
            dialog: ConfirmationDialog::default(),
            audio,
            options,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn screen_kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn dialog(&self) -> &ConfirmationDialog {
        &self.dialog
    }

    pub fn audio(&self) -> &AudioControl {
        &self.audio
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Commands the initial screen needs
    pub fn start(&mut self) -> Vec<Command> {
        let effects = self.screen.init();
        self.apply(effects)
    }

    /// Handle one event and return the backend work it produced
    pub fn dispatch(&mut self, event: AppEvent) -> Vec<Command> {
        if self.should_quit {
            return Vec::new();
        }
        if let AppEvent::Resize(width, height) = event {
            self.viewport = Viewport::new(width, height);
        }

        let input = matches!(event, AppEvent::Key(_) | AppEvent::Mouse(_));
        if self.dialog.is_active() && input {
            if let AppEvent::Key(key) = event {
                let (_, confirmed) = self.dialog.update(key);
                if confirmed {
                    self.quit();
                }
            }
            return Vec::new();
        }

        if let AppEvent::Key(key) = event {
            let action = key_to_navigation(key);
            if is_global_key(action) {
                match action {
                    NavigationAction::ToggleAudio => {
                        let playing = self.audio.toggle();
                        tracing::info!(playing, "Toggled music");
                    }
                    NavigationAction::Back if self.options.confirm_exit => self.dialog.activate(),
                    _ => self.quit(),
                }
                return Vec::new();
            }
        }

        let effects = self.screen.handle_event(&event);
        self.apply(effects)
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Command> {
        let mut commands = Vec::new();
        let mut pending = effects;
        while !pending.is_empty() {
            let mut next = Vec::new();
            for effect in pending {
                match effect {
                    Effect::Command(command) => commands.push(command),
                    Effect::Complete(completion) => next.extend(self.transition(completion)),
                    Effect::Quit => self.quit(),
                }
            }
            pending = next;
        }
        commands
    }

    /// Replace the active screen and return its init effects
    fn transition(&mut self, completion: Completion) -> Vec<Effect> {
        let next = match completion {
            Completion::LoggedIn => Screen::Menu(MenuScreen::new()),
            Completion::OpenQuestionnaireEditor => {
                Screen::EditQuestionnaire(EditQuestionnaireScreen::new())
            }
            Completion::EditQuiz { row, origin } => Screen::QuizMetadata(QuizMetadataScreen::new(
                row.as_ref(),
                origin,
                self.options.creator_name.clone(),
            )),
            Completion::MetadataCompleted {
                quiz,
                origin,
                warning,
            } => Screen::DynamicQuestions(DynamicQuestionsScreen::new(&quiz, origin, warning)),
            Completion::QuestionsCompleted => {
                tracing::info!("All question forms completed");
                self.quit();
                return Vec::new();
            }
        };

        tracing::info!(from = ?self.screen.kind(), to = ?next.kind(), "Screen transition");
        self.screen = next;
        let mut effects = self.screen.init();
        if self.viewport != Viewport::default() {
            // The new screen lays itself out for the current window
            let Viewport { width, height } = self.viewport;
            effects.extend(self.screen.handle_event(&AppEvent::Resize(width, height)));
        }
        effects
    }

    fn quit(&mut self) {
        if !self.should_quit {
            tracing::info!(screen = ?self.screen.kind(), "Quitting");
        }
        self.should_quit = true;
    }

    /// Draw the active screen and, over it, the dialog
    pub fn render(&mut self, f: &mut Frame) {
        let area = f.size();
        self.viewport = Viewport::new(area.width, area.height);
        self.screen.render(f, self.viewport);
        self.dialog.render(f, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn session(confirm_exit: bool) -> Session {
        Session::new(
            SessionOptions {
                confirm_exit,
                creator_name: None,
            },
            AudioControl::new(false),
        )
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_starts_on_login() {
        let mut session = session(false);
        assert_eq!(session.screen_kind(), ScreenKind::Login);
        assert!(session.start().is_empty());
        assert!(!session.should_quit());
    }

    #[test]
    fn test_login_to_menu() {
        let mut session = session(false);
        assert!(session.dispatch(key(KeyCode::Enter)).is_empty());
        assert_eq!(session.screen_kind(), ScreenKind::Menu);
    }

    #[test]
    fn test_esc_quits_without_dialog() {
        let mut session = session(false);
        session.dispatch(key(KeyCode::Esc));
        assert!(session.should_quit());
    }

    #[test]
    fn test_esc_asks_when_configured() {
        let mut session = session(true);
        session.dispatch(key(KeyCode::Esc));
        assert!(!session.should_quit());
        assert!(session.dialog().is_active());

        // Input is held by the dialog
        session.dispatch(key(KeyCode::Enter));
        assert_eq!(session.screen_kind(), ScreenKind::Login);

        session.dispatch(key(KeyCode::Char('n')));
        assert!(!session.dialog().is_active());
        assert!(!session.should_quit());

        session.dispatch(key(KeyCode::Esc));
        session.dispatch(key(KeyCode::Char('y')));
        assert!(session.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut session = session(true);
        session.dispatch(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(session.should_quit());
        assert!(!session.dialog().is_active());
    }

    #[test]
    fn test_audio_toggle_on_any_screen() {
        let mut session = session(false);
        let toggle = || AppEvent::Key(KeyEvent::new(KeyCode::End, KeyModifiers::ALT));
        session.dispatch(toggle());
        assert!(session.audio().is_playing());

        session.dispatch(key(KeyCode::Enter));
        assert_eq!(session.screen_kind(), ScreenKind::Menu);
        session.dispatch(toggle());
        assert!(!session.audio().is_playing());
    }

    #[test]
    fn test_resize_updates_viewport() {
        let mut session = session(false);
        session.dispatch(AppEvent::Resize(120, 40));
        assert_eq!(session.viewport(), Viewport::new(120, 40));
    }

    #[test]
    fn test_editor_requests_quizzes() {
        let mut session = session(false);
        session.dispatch(key(KeyCode::Enter));
        session.dispatch(key(KeyCode::Down));
        session.dispatch(key(KeyCode::Down));
        let commands = session.dispatch(key(KeyCode::Enter));
        assert_eq!(session.screen_kind(), ScreenKind::EditQuestionnaireList);
        assert!(matches!(commands.as_slice(), [Command::FetchQuizzes]));
    }

    #[test]
    fn test_events_ignored_after_quit() {
        let mut session = session(false);
        session.dispatch(key(KeyCode::Esc));
        session.dispatch(key(KeyCode::Enter));
        assert_eq!(session.screen_kind(), ScreenKind::Login);
    }
}
