use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use pratik_core::pcm::AudioBuffer;
use pratik_core::ports::{AudioOutput, AudioOutputFactory, PlaybackError};

/// Output without a device: keeps a wall clock and discards samples.
pub struct NullAudioOutput {
    opened_at: Instant,
    playing: AtomicBool,
    closed: AtomicBool,
}

impl NullAudioOutput {
    pub fn new() -> Self {
        Self {
            opened_at: Instant::now(),
            playing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for NullAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for NullAudioOutput {
    fn current_time(&self) -> f64 {
        self.opened_at.elapsed().as_secs_f64()
    }

    fn start(&self, buffer: Arc<AudioBuffer>, offset_secs: f64) -> Result<(), PlaybackError> {
        if self.is_closed() {
            return Err(PlaybackError::Output("output is closed".to_string()));
        }
        tracing::trace!(
            offset_secs,
            duration_secs = buffer.duration_secs(),
            "Null output started"
        );
        self.playing.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::Release);
    }

    fn close(&self) {
        self.stop();
        self.closed.store(true, Ordering::Release);
    }
}

/// Opens a [`NullAudioOutput`] for any format.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudioOutputFactory;

impl AudioOutputFactory for NullAudioOutputFactory {
    fn open(&self, sample_rate: u32, channels: u16) -> Result<Box<dyn AudioOutput>, PlaybackError> {
        tracing::debug!(sample_rate, channels, "Opening null audio output");
        Ok(Box::new(NullAudioOutput::new()))
    }
}
