use async_trait::async_trait;

use pratik_core::ports::{ContentGenerator, GeneratedArticle, ImageGenerator, SpeechSynthesizer};

use super::placeholder_cover;

/// Generator used when no model backend is configured.
///
/// Behaves like a backend whose every call failed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGenerator;

#[async_trait]
impl ContentGenerator for OfflineGenerator {
    async fn generate_article(&self, title: &str) -> GeneratedArticle {
        tracing::warn!(title, "No generation backend configured");
        GeneratedArticle::placeholder()
    }
}

#[async_trait]
impl ImageGenerator for OfflineGenerator {
    async fn generate_cover_image(&self, _title: &str) -> String {
        placeholder_cover()
    }
}

#[async_trait]
impl SpeechSynthesizer for OfflineGenerator {
    async fn synthesize_speech(&self, _text: &str) -> Option<String> {
        tracing::warn!("No speech backend configured");
        None
    }
}
