//! Audio output implementations.

mod null;

#[cfg(feature = "audio-device")]
mod device;

pub use null::{NullAudioOutput, NullAudioOutputFactory};

#[cfg(feature = "audio-device")]
pub use device::{CpalAudioOutput, CpalAudioOutputFactory};
