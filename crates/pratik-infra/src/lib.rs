//! # Pratik Infrastructure
//!
//! Concrete implementations of the ports defined in `pratik-core`.
//! This crate contains the post stores, the generative service clients,
//! preference persistence and audio outputs.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All network clients enabled
//! - `minimal` - No network clients, in-memory only
//! - `gemini` - Gemini REST client for content, cover and speech generation
//! - `http-store` - Clients for the blog server API
//! - `audio-device` - Playback on the default output device via cpal

pub mod audio;
pub mod generation;
pub mod preferences;
pub mod store;

#[cfg(feature = "http-store")]
pub mod http;

// Re-exports - In-Memory
pub use audio::{NullAudioOutput, NullAudioOutputFactory};
pub use generation::{OfflineGenerator, placeholder_cover};
pub use preferences::{
    EnvColorScheme, FixedColorScheme, InMemoryPreferenceStore, JsonFilePreferenceStore,
};
pub use store::InMemoryPostStore;

// Re-exports - Network
#[cfg(feature = "gemini")]
pub use generation::{GeminiClient, GeminiConfig, GeminiError};
#[cfg(feature = "http-store")]
pub use http::{ApiConfig, HttpGenerationClient, HttpPostStore};

// Re-exports - Device
#[cfg(feature = "audio-device")]
pub use audio::{CpalAudioOutput, CpalAudioOutputFactory};
