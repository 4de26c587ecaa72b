//! Post authoring: the typed new-post form and AI-assisted drafting.

use std::sync::Arc;

use crate::domain::{Post, PostDraft};
use crate::error::DomainError;
use crate::feed::Feed;
use crate::ports::{ContentGenerator, ImageGenerator};

/// Message returned when auto-generation is requested without a title.
pub const TITLE_REQUIRED: &str = "Please enter a title first!";

/// Editable new-post form. Unset and blank fields are equivalent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub excerpt: Option<String>,
    /// Comma-separated tag list as typed.
    pub tags: Option<String>,
}

fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PostForm {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Split a comma-separated tag list, trimming and dropping blanks.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Check required fields and build the draft to submit.
    pub fn validate(&self) -> Result<PostDraft, DomainError> {
        let required = [
            ("title", &self.title),
            ("author", &self.author),
            ("content", &self.content),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| filled(value).is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(PostDraft {
            title: filled(&self.title).unwrap_or_default().to_string(),
            author: filled(&self.author).unwrap_or_default().to_string(),
            content: self.content.clone().unwrap_or_default(),
            image_url: filled(&self.image_url).unwrap_or_default().to_string(),
            excerpt: self.excerpt.clone().unwrap_or_default(),
            tags: self.tags.as_deref().map(Self::parse_tags).unwrap_or_default(),
        })
    }
}

/// Drafting helpers backed by the generative services.
pub struct Authoring {
    content: Arc<dyn ContentGenerator>,
    images: Arc<dyn ImageGenerator>,
}

impl Authoring {
    pub fn new(content: Arc<dyn ContentGenerator>, images: Arc<dyn ImageGenerator>) -> Self {
        Self { content, images }
    }

    /// Fill content, excerpt, tags and cover image from the form's title.
    ///
    /// Both generators run concurrently; each falls back on its own failure.
    pub async fn auto_generate(&self, form: &mut PostForm) -> Result<(), DomainError> {
        let Some(title) = filled(&form.title).map(str::to_string) else {
            return Err(DomainError::Validation(TITLE_REQUIRED.to_string()));
        };

        tracing::info!(title = %title, "Generating draft");
        let (article, image_url) = tokio::join!(
            self.content.generate_article(&title),
            self.images.generate_cover_image(&title)
        );

        form.content = Some(article.content);
        form.excerpt = Some(article.excerpt);
        form.tags = Some(article.tags.join(", "));
        form.image_url = Some(image_url);
        Ok(())
    }

    /// Validate the form and publish it through the feed.
    pub async fn submit(&self, feed: &Feed, form: &PostForm) -> Result<Post, DomainError> {
        let draft = form.validate()?;
        Ok(feed.create(draft).await?)
    }
}
