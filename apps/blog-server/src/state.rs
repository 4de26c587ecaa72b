//! Application state - shared across all handlers.

use std::sync::Arc;

use pratik_core::ports::{ContentGenerator, ImageGenerator, PostStore, SpeechSynthesizer};
use pratik_infra::{InMemoryPostStore, OfflineGenerator};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub articles: Arc<dyn ContentGenerator>,
    pub covers: Arc<dyn ImageGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        let store = InMemoryPostStore::seeded(config.seed_posts).with_latency(config.store_latency);

        #[cfg(feature = "gemini")]
        let state = match &config.gemini {
            Some(gemini) => match pratik_infra::GeminiClient::new(gemini.clone()) {
                Ok(client) => {
                    tracing::info!("Gemini generation enabled");
                    let client = Arc::new(client);
                    Self {
                        posts: Arc::new(store),
                        articles: client.clone(),
                        covers: client.clone(),
                        speech: client,
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to build Gemini client. Using offline fallbacks."
                    );
                    Self::offline(Arc::new(store))
                }
            },
            None => {
                tracing::warn!("GEMINI_API_KEY not set. Generation will use offline fallbacks.");
                Self::offline(Arc::new(store))
            }
        };

        #[cfg(not(feature = "gemini"))]
        let state = {
            tracing::info!("Running without gemini feature - using offline fallbacks");
            Self::offline(Arc::new(store))
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State over `posts` with every generator falling back.
    pub fn offline(posts: Arc<dyn PostStore>) -> Self {
        let generator = Arc::new(OfflineGenerator);
        Self {
            posts,
            articles: generator.clone(),
            covers: generator.clone(),
            speech: generator,
        }
    }
}
