//! Generative service adapters.
//!
//! All of them fail open: errors are logged and a fallback is returned.

mod offline;

#[cfg(feature = "gemini")]
mod gemini;

pub use offline::OfflineGenerator;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiClient, GeminiConfig, GeminiError};

use rand::Rng;

/// Random stock cover used when no image could be generated.
pub fn placeholder_cover() -> String {
    let seed: u32 = rand::thread_rng().gen_range(0..1000);
    format!("https://picsum.photos/800/600?random={seed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_cover_is_a_picsum_url() {
        let url = placeholder_cover();
        let seed: u32 = url
            .strip_prefix("https://picsum.photos/800/600?random=")
            .unwrap()
            .parse()
            .unwrap();
        assert!(seed < 1000);
    }
}
