//! Decoding of base64 transported 16-bit PCM into normalized samples.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Sample rate of synthesized speech.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Channel count of synthesized speech.
pub const SPEECH_CHANNELS: u16 = 1;

const I16_SCALE: f32 = 32768.0;

#[derive(Debug, Error)]
pub enum PcmError {
    #[error("invalid base64 payload: {0}")]
    Transport(#[from] base64::DecodeError),

    #[error("payload of {0} bytes is not a whole number of 16-bit samples")]
    OddLength(usize),

    #[error("channel count must be positive")]
    NoChannels,
}

/// Decoded audio: one sample vector per channel, normalized to `[-1.0, 1.0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Frame index corresponding to `offset_secs`, clamped to the buffer.
    pub fn frame_at(&self, offset_secs: f64) -> usize {
        let frame = (offset_secs.max(0.0) * f64::from(self.sample_rate)) as usize;
        frame.min(self.frames())
    }
}

/// Decode a base64 payload of little-endian interleaved `i16` samples.
pub fn decode_base64_pcm(
    payload: &str,
    sample_rate: u32,
    channels: u16,
) -> Result<AudioBuffer, PcmError> {
    let bytes = STANDARD.decode(payload.trim())?;
    decode_pcm16(&bytes, sample_rate, channels)
}

/// Deinterleave little-endian `i16` samples and scale them by 1/32768.
///
/// Trailing samples that do not fill a whole frame are dropped.
pub fn decode_pcm16(
    bytes: &[u8],
    sample_rate: u32,
    channels: u16,
) -> Result<AudioBuffer, PcmError> {
    if channels == 0 {
        return Err(PcmError::NoChannels);
    }
    if bytes.len() % 2 != 0 {
        return Err(PcmError::OddLength(bytes.len()));
    }

    let channel_count = usize::from(channels);
    let frames = bytes.len() / 2 / channel_count;
    let mut out = vec![Vec::with_capacity(frames); channel_count];

    for (index, pair) in bytes.chunks_exact(2).take(frames * channel_count).enumerate() {
        let sample = i16::from_le_bytes([pair[0], pair[1]]);
        out[index % channel_count].push(f32::from(sample) / I16_SCALE);
    }

    Ok(AudioBuffer::new(sample_rate, out))
}
