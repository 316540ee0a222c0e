//! Screen identity and keyboard navigation
//!
//! Holds the screen tag, the window viewport, and the translation of raw
//! key events into navigation actions shared by every screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which top-level screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    /// SSO login/signup choice
    Login,
    /// Main menu
    Menu,
    /// Quiz table with the "Create" button
    EditQuestionnaireList,
    /// Quiz metadata form
    QuizMetadataForm,
    /// One form per question
    DynamicQuestionForms,
}

impl Default for ScreenKind {
    fn default() -> Self {
        Self::Login
    }
}

/// Current terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Navigation actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Move selection up (arrow up, k)
    Up,
    /// Move selection down (arrow down, j)
    Down,
    /// Move selection left (arrow left, h)
    Left,
    /// Move selection right (arrow right, l)
    Right,
    /// Confirm selection (Enter)
    Select,
    /// Leave the application (Esc)
    Back,
    /// Next focus target (Tab)
    Next,
    /// Previous focus target (Shift+Tab)
    Previous,
    /// Save and go to the next question (Ctrl+Right)
    Advance,
    /// Save and go to the previous question (Ctrl+Left)
    Retreat,
    /// Retry the last backend sync (Ctrl+R)
    Retry,
    /// Mute/unmute background music (Alt+End)
    ToggleAudio,
    /// Quit immediately (Ctrl+C)
    Quit,
    /// No action
    None,
}

/// Convert keyboard event to navigation action
pub fn key_to_navigation(key: KeyEvent) -> NavigationAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => NavigationAction::Quit,
        KeyCode::Char('r') if ctrl => NavigationAction::Retry,
        KeyCode::End if alt => NavigationAction::ToggleAudio,
        KeyCode::Right if ctrl => NavigationAction::Advance,
        KeyCode::Left if ctrl => NavigationAction::Retreat,

        // Navigation keys
        KeyCode::Up | KeyCode::Char('k') => NavigationAction::Up,
        KeyCode::Down | KeyCode::Char('j') => NavigationAction::Down,
        KeyCode::Left | KeyCode::Char('h') => NavigationAction::Left,
        KeyCode::Right | KeyCode::Char('l') => NavigationAction::Right,

        KeyCode::Enter => NavigationAction::Select,
        KeyCode::Esc => NavigationAction::Back,

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                NavigationAction::Previous
            } else {
                NavigationAction::Next
            }
        }
        KeyCode::BackTab => NavigationAction::Previous,

        _ => NavigationAction::None,
    }
}

/// Whether a key is handled by the session before any screen sees it.
///
/// Text-entry screens must not lose letters like `h` or `j` to navigation,
/// so only modifier chords and Esc qualify.
pub fn is_global_key(action: NavigationAction) -> bool {
    matches!(
        action,
        NavigationAction::Quit | NavigationAction::ToggleAudio | NavigationAction::Back
    )
}
