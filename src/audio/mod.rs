//! Background music side-channel
//!
//! A dedicated thread owns the player and polls a shared play/pause flag.
//! The flag is the only state shared with the UI loop: the loop writes it
//! from the toggle key, the audio thread only reads it.

use crate::config::AppConfig;
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(feature = "audio")]
pub mod rodio_player;

/// How often the audio thread looks at the flag
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that can play a looping track
pub trait Playback {
    fn play(&mut self);
    fn pause(&mut self);
    /// Release the output device; called once before the thread exits
    fn release(&mut self);
}

/// Builds the player on the audio thread, since output devices are often
/// not `Send`.
pub type PlaybackFactory = Box<dyn FnOnce() -> Result<Box<dyn Playback>> + Send>;

/// Shared play/pause flag
#[derive(Debug, Clone)]
pub struct AudioControl {
    playing: Arc<AtomicBool>,
}

impl AudioControl {
    pub fn new(playing: bool) -> Self {
        Self {
            playing: Arc::new(AtomicBool::new(playing)),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Flip the flag and return the new state
    pub fn toggle(&self) -> bool {
        !self.playing.fetch_xor(true, Ordering::AcqRel)
    }
}

impl Default for AudioControl {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Player that produces no sound; used when no audio backend is compiled in
#[derive(Debug, Default)]
pub struct SilentPlayback {
    playing: bool,
}

impl Playback for SilentPlayback {
    fn play(&mut self) {
        self.playing = true;
        tracing::debug!("Background music playing (silent)");
    }

    fn pause(&mut self) {
        self.playing = false;
        tracing::debug!("Background music paused (silent)");
    }

    fn release(&mut self) {
        self.playing = false;
    }
}

/// Handle to the running audio thread
pub struct AudioChannel {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AudioChannel {
    /// Start the playback thread
    pub fn spawn(control: AudioControl, factory: PlaybackFactory) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = shutdown.clone();

        let handle = thread::Builder::new()
            .name("letsquiz-audio".to_string())
            .spawn(move || playback_loop(control, thread_shutdown, factory))?;

        Ok(Self {
            shutdown,
            handle: Some(handle),
        })
    }

    /// Ask the thread to release the player and wait for it
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Audio thread panicked");
            }
        }
    }
}

impl Drop for AudioChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn playback_loop(control: AudioControl, shutdown: Arc<AtomicBool>, factory: PlaybackFactory) {
    let mut player = match factory() {
        Ok(player) => player,
        Err(err) => {
            tracing::error!(error = %err, "Background music unavailable");
            return;
        }
    };

    let mut applied: Option<bool> = None;
    while !shutdown.load(Ordering::Acquire) {
        let wanted = control.is_playing();
        if applied != Some(wanted) {
            if wanted {
                player.play();
            } else {
                player.pause();
            }
            applied = Some(wanted);
        }
        thread::sleep(POLL_INTERVAL);
    }

    player.release();
    tracing::info!("Audio thread released its player");
}

/// Player factory for the configured track
pub fn playback_factory(config: &AppConfig) -> PlaybackFactory {
    #[cfg(feature = "audio")]
    {
        let track = config.main_track.clone();
        Box::new(move || {
            let player = rodio_player::RodioPlayback::open(&track)?;
            Ok(Box::new(player) as Box<dyn Playback>)
        })
    }
    #[cfg(not(feature = "audio"))]
    {
        tracing::debug!(track = %config.main_track.display(), "Built without audio, using silent player");
        Box::new(|| Ok(Box::new(SilentPlayback::default()) as Box<dyn Playback>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingPlayback {
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Playback for RecordingPlayback {
        fn play(&mut self) {
            self.calls.lock().unwrap().push("play");
        }
        fn pause(&mut self) {
            self.calls.lock().unwrap().push("pause");
        }
        fn release(&mut self) {
            self.calls.lock().unwrap().push("release");
        }
    }

    #[test]
    fn test_toggle_flips_flag() {
        let control = AudioControl::new(true);
        assert!(!control.toggle());
        assert!(!control.is_playing());
        assert!(control.toggle());
        assert!(control.clone().is_playing());
    }

    #[test]
    fn test_thread_follows_flag_and_releases() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let factory_calls = calls.clone();
        let control = AudioControl::new(true);
        let mut channel = AudioChannel::spawn(
            control.clone(),
            Box::new(move || {
                Ok(Box::new(RecordingPlayback {
                    calls: factory_calls,
                }) as Box<dyn Playback>)
            }),
        )
        .unwrap();

        thread::sleep(POLL_INTERVAL * 2);
        control.toggle();
        thread::sleep(POLL_INTERVAL * 3);
        channel.shutdown();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.first(), Some(&"play"));
        assert!(calls.contains(&"pause"));
        assert_eq!(calls.last(), Some(&"release"));
    }

    #[test]
    fn test_failed_factory_does_not_hang_shutdown() {
        let mut channel = AudioChannel::spawn(
            AudioControl::default(),
            Box::new(|| Err(crate::AppError::Audio("no device".to_string()))),
        )
        .unwrap();
        channel.shutdown();
        channel.shutdown();
    }
}
