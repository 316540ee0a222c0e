//! Main application controller
//!
//! Owns the terminal, the session and the background work: command tasks,
//! the signal watcher and the audio thread. The loop dispatches one event
//! at a time, so no two screen updates ever overlap.

use crate::{
    app::{
        commands::spawn_command,
        event::{AppEvent, Command},
        session::{Session, SessionOptions},
        tui::Tui,
    },
    audio::{playback_factory, AudioChannel, AudioControl},
    client::{HttpBackend, QuizBackend},
    config::AppConfig,
    Result,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{sync::mpsc, task::JoinHandle};

/// TUI application controller
pub struct App {
    /// Terminal UI handler
    tui: Tui,
    session: Session,
    backend: Arc<dyn QuizBackend>,
    config: AppConfig,
    request_timeout: Duration,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Outstanding command tasks, aborted on shutdown
    tasks: Vec<JoinHandle<()>>,
    signal_task: Option<JoinHandle<()>>,
    audio: Option<AudioChannel>,
    interrupted: Arc<AtomicBool>,
}

impl App {
    /// Create the application talking to the configured backend
    pub fn new(config: AppConfig) -> Result<Self> {
        let backend = HttpBackend::new(&config.backend_url, config.request_timeout())?;
        Self::with_backend(config, Arc::new(backend))
    }

    pub fn with_backend(config: AppConfig, backend: Arc<dyn QuizBackend>) -> Result<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let audio = AudioControl::new(config.audio_enabled);
        Ok(Self {
            tui: Tui::new(config.tick_rate())?,
            session: Session::new(SessionOptions::from(&config), audio),
            backend,
            request_timeout: config.request_timeout(),
            config,
            events_tx,
            events_rx,
            tasks: Vec::new(),
            signal_task: None,
            audio: None,
            interrupted: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Take over the terminal and start background services
    pub fn init(&mut self) -> Result<()> {
        self.tui.init()?;

        if self.config.audio_enabled {
            let control = self.session.audio().clone();
            match AudioChannel::spawn(control, playback_factory(&self.config)) {
                Ok(channel) => self.audio = Some(channel),
                Err(err) => tracing::error!(error = %err, "Failed to start audio thread"),
            }
        }

        self.signal_task = Some(watch_signals(self.interrupted.clone()));

        let size = self.tui.size()?;
        let mut commands = self.session.start();
        commands.extend(self.session.dispatch(AppEvent::Resize(size.width, size.height)));
        self.spawn(commands);
        Ok(())
    }

    /// Run the main application loop until the session quits or the
    /// process is interrupted, then shut everything down
    pub async fn run(&mut self) -> Result<()> {
        let result = self.event_loop().await;
        self.shutdown();
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        while !self.session.should_quit() {
            if self.interrupted.load(Ordering::Acquire) {
                tracing::info!("Interrupted, leaving event loop");
                break;
            }

            while let Ok(event) = self.events_rx.try_recv() {
                let commands = self.session.dispatch(event);
                self.spawn(commands);
            }
            if self.session.should_quit() {
                break;
            }

            let session = &mut self.session;
            self.tui.draw(|f| session.render(f))?;

            if let Some(event) = self.tui.next_event()? {
                let commands = self.session.dispatch(event);
                self.spawn(commands);
            }

            self.tasks.retain(|task| !task.is_finished());
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn spawn(&mut self, commands: Vec<Command>) {
        for command in commands {
            tracing::debug!(command = command.name(), "Spawning command");
            self.tasks.push(spawn_command(
                self.backend.clone(),
                command,
                self.request_timeout,
                self.events_tx.clone(),
            ));
        }
    }

    /// Abort outstanding commands, stop the audio thread and give the
    /// terminal back
    pub fn shutdown(&mut self) {
        let outstanding = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(task) = self.signal_task.take() {
            task.abort();
        }
        if let Some(mut audio) = self.audio.take() {
            audio.shutdown();
        }
        if let Err(err) = self.tui.restore() {
            tracing::error!(error = %err, "Failed to restore terminal");
        }
        tracing::info!(aborted = outstanding, "Shut down");
    }
}

/// Set `flag` on SIGINT or SIGTERM
fn watch_signals(flag: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut terminate) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = terminate.recv() => {}
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Cannot watch SIGTERM");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        tracing::info!("Termination signal received");
        flag.store(true, Ordering::Release);
    })
}
