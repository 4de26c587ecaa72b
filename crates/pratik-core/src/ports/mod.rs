//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod audio;
mod generation;
mod preference;
mod store;

pub use audio::{AudioOutput, AudioOutputFactory, PlaybackError};
pub use generation::{ContentGenerator, GeneratedArticle, ImageGenerator, SpeechSynthesizer};
pub use preference::{ColorSchemeProbe, PreferenceError, PreferenceStore};
pub use store::{FEATURED_COUNT, PostStore};
