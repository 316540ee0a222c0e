//! Looping track playback through rodio.

use super::Playback;
use crate::{AppError, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct RodioPlayback {
    // Dropping the stream stops all output
    _stream: OutputStream,
    sink: Sink,
}

impl RodioPlayback {
    /// Open the default output device and queue `track` on repeat, paused
    pub fn open(track: &Path) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AppError::Audio(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| AppError::Audio(e.to_string()))?;
        let file = File::open(track).map_err(|e| {
            AppError::Audio(format!("Failed to open {}: {}", track.display(), e))
        })?;
        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| AppError::Audio(format!("Failed to decode {}: {}", track.display(), e)))?;
        sink.append(source.repeat_infinite());
        sink.pause();
        Ok(Self {
            _stream: stream,
            sink,
        })
    }
}

impl Playback for RodioPlayback {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn release(&mut self) {
        self.sink.stop();
    }
}
