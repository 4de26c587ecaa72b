//! Generative service ports.
//!
//! Every call fails open: implementations log the failure and hand back a
//! fallback value instead of an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body, excerpt and tags generated for a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

impl GeneratedArticle {
    /// Returned when generation fails.
    pub fn placeholder() -> Self {
        Self {
            content: "Could not generate content at this time. Please try writing it yourself!"
                .to_string(),
            excerpt: "AI generation failed.".to_string(),
            tags: vec!["Error".to_string()],
        }
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_article(&self, title: &str) -> GeneratedArticle;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Cover image URI for a title (a `data:` URI or a placeholder URL).
    async fn generate_cover_image(&self, title: &str) -> String;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Base64 encoded 16-bit PCM for `text`, or `None` when nothing was produced.
    async fn synthesize_speech(&self, text: &str) -> Option<String>;
}
