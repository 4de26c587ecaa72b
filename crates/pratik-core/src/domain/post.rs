use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters per minute used for the read time estimate.
pub const READ_CHARS_PER_MINUTE: usize = 500;

/// Display format of [`Post::date`], e.g. `Oct 24, 2023`.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Opaque post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthesize a fresh identifier for a newly created post.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple[..9].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Post entity - a published blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: String,
    pub image_url: String,
    pub read_time: String,
    pub tags: Vec<String>,
}

impl Post {
    /// Materialize a draft with a synthesized id, the given creation time and
    /// a read time computed from the content length.
    pub fn from_draft(draft: PostDraft, created_at: DateTime<Utc>) -> Self {
        let read_time = read_time_label(&draft.content);
        Self {
            id: PostId::generate(),
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            author: draft.author,
            date: created_at.format(DATE_FORMAT).to_string(),
            image_url: draft.image_url,
            read_time,
            tags: draft.tags,
        }
    }

    /// Non-blank lines of the content, trimmed.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Case-insensitive substring match on the title or any tag.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// A post as submitted by an author; the store assigns id, date and read time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub image_url: String,
    pub tags: Vec<String>,
}

impl PostDraft {
    /// Required fields (title, author, content) that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("author", &self.author),
            ("content", &self.content),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// `"N min read"` where N is the content length over
/// [`READ_CHARS_PER_MINUTE`], rounded up.
pub fn read_time_label(content: &str) -> String {
    let minutes = content.chars().count().div_ceil(READ_CHARS_PER_MINUTE);
    format!("{minutes} min read")
}
