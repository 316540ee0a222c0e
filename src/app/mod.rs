//! TUI application module
//!
//! Contains the terminal wrapper, the session controller with its screens
//! and forms, and the runner for backend commands.

pub mod app;
pub mod commands;
pub mod dialog;
pub mod event;
pub mod form;
pub mod screens;
pub mod session;
pub mod state;
pub mod tui;

pub use app::App;
pub use event::{AppEvent, Command, Completion, Effect, NetworkEvent};
pub use session::{Session, SessionOptions};
pub use state::{NavigationAction, ScreenKind, Viewport};
pub use tui::Tui;
