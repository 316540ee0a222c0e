//! Terminal management system
//!
//! Handles crossterm backend initialization, screen management,
//! and input polling for the TUI application.

use crate::app::event::AppEvent;
use crate::{AppError, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};

/// Longest time a single poll blocks, so backend results are picked up
/// promptly between ticks
const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn tui_error(action: &str, err: io::Error) -> AppError {
    AppError::Tui(format!("Failed to {}: {}", action, err))
}

/// Terminal wrapper that manages crossterm backend and screen state
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
    last_tick: Instant,
    tick_rate: Duration,
}

impl Tui {
    /// Create a new TUI instance with crossterm backend
    pub fn new(tick_rate: Duration) -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend).map_err(|e| tui_error("open terminal", e))?;

        Ok(Self {
            terminal,
            active: false,
            last_tick: Instant::now(),
            tick_rate,
        })
    }

    /// Enter raw mode and the alternate screen with mouse capture
    pub fn init(&mut self) -> Result<()> {
        self.enter().map_err(|e| tui_error("set up terminal", e))
    }

    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.active = true;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore terminal to original state
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.leave().map_err(|e| tui_error("restore terminal", e))
    }

    fn leave(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Current terminal size
    pub fn size(&self) -> Result<ratatui::layout::Rect> {
        self.terminal
            .size()
            .map_err(|e| tui_error("read terminal size", e))
    }

    /// Draw the UI using the provided render function
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal
            .draw(f)
            .map_err(|e| tui_error("draw frame", e))?;
        Ok(())
    }

    /// Wait briefly for input. Returns the next key, mouse or resize
    /// event, a `Tick` once the tick rate has elapsed, or `None`.
    pub fn next_event(&mut self) -> Result<Option<AppEvent>> {
        self.poll().map_err(|e| tui_error("read input", e))
    }

    fn poll(&mut self) -> io::Result<Option<AppEvent>> {
        let until_tick = self
            .tick_rate
            .checked_sub(self.last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(until_tick.min(POLL_INTERVAL))? {
            match event::read()? {
                // Release/repeat events would double every keystroke on some platforms
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Some(AppEvent::Key(key)))
                }
                Event::Mouse(mouse) => return Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(width, height) => return Ok(Some(AppEvent::Resize(width, height))),
                _ => {}
            }
        }

        if self.last_tick.elapsed() >= self.tick_rate {
            self.last_tick = Instant::now();
            return Ok(Some(AppEvent::Tick));
        }

        Ok(None)
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Ensure terminal is restored even if restore() wasn't called
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `None` when no terminal is attached, e.g. under CI
    fn tui(tick_rate: Duration) -> Option<Tui> {
        Tui::new(tick_rate).ok()
    }

    #[test]
    fn test_restore_without_init_is_noop() {
        let Some(mut tui) = tui(Duration::from_millis(1000)) else {
            return;
        };
        assert!(!tui.is_active());
        assert!(tui.restore().is_ok());
        assert!(!tui.is_active());
    }

    #[test]
    fn test_terminal_failures_are_tui_errors() {
        let err = tui_error("draw frame", io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(&err, AppError::Tui(msg) if msg == "Failed to draw frame: closed"));
        assert_eq!(err.to_string(), "TUI error: Failed to draw frame: closed");
    }

    #[test]
    fn test_tick_rate() {
        let Some(tui) = tui(Duration::from_millis(250)) else {
            return;
        };
        assert_eq!(tui.tick_rate(), Duration::from_millis(250));
    }
}
