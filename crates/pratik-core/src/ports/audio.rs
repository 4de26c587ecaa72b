//! Audio output port.

use std::sync::Arc;

use crate::pcm::{AudioBuffer, PcmError};

/// An opened audio output with its own clock.
pub trait AudioOutput: Send + Sync {
    /// Seconds elapsed on the output clock since it was opened.
    fn current_time(&self) -> f64;

    /// Start playing `buffer` from `offset_secs`, replacing anything playing.
    fn start(&self, buffer: Arc<AudioBuffer>, offset_secs: f64) -> Result<(), PlaybackError>;

    /// Stop the active source, if any.
    fn stop(&self);

    /// Release the output. Calls after the first are no-ops.
    fn close(&self);
}

/// Opens audio outputs on demand.
pub trait AudioOutputFactory: Send + Sync {
    fn open(&self, sample_rate: u32, channels: u16) -> Result<Box<dyn AudioOutput>, PlaybackError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Audio decode failed: {0}")]
    Decode(#[from] PcmError),
}
