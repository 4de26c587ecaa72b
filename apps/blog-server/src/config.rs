//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

#[cfg(feature = "gemini")]
use pratik_infra::GeminiConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Number of generated archive posts seeded after the curated ones.
    pub seed_posts: usize,
    /// Simulated latency of every store operation.
    pub store_latency: Duration,
    #[cfg(feature = "gemini")]
    pub gemini: Option<GeminiConfig>,
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            seed_posts: parsed("SEED_POSTS").unwrap_or(500),
            store_latency: Duration::from_millis(parsed("STORE_LATENCY_MS").unwrap_or(0)),
            #[cfg(feature = "gemini")]
            gemini: GeminiConfig::from_env(),
        }
    }
}
