//! Reader configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use pratik_core::feed::FeedConfig;
use pratik_core::playback::PlaybackConfig;

#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Base URL of the blog server; the in-memory store is used when unset.
    pub api_url: Option<String>,
    pub feed: FeedConfig,
    pub playback: PlaybackConfig,
    pub preferences_path: PathBuf,
    /// Archive posts seeded into the in-memory store.
    pub seed_posts: usize,
    /// Author recorded on posts drafted from the terminal.
    pub author: String,
}

impl ReaderConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("BLOG_API_URL").ok().filter(|v| !v.trim().is_empty()),
            feed: FeedConfig::from_env(),
            playback: PlaybackConfig::default(),
            preferences_path: env::var("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".pratik/preferences.json")),
            seed_posts: env::var("SEED_POSTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            author: env::var("READER_AUTHOR").unwrap_or_else(|_| "Anonymous".to_string()),
        }
    }
}
