//! Port doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::domain::{Page, Post, PostDraft, PostId};
use crate::error::StoreError;
use crate::ports::{
    ContentGenerator, FEATURED_COUNT, GeneratedArticle, ImageGenerator, PostStore,
};

pub(crate) fn post(id: &str, title: &str, tags: &[&str]) -> Post {
    Post {
        id: PostId::new(id),
        title: title.to_string(),
        excerpt: String::new(),
        content: format!("Body of {title}"),
        author: "Tester".to_string(),
        date: "Oct 1, 2023".to_string(),
        image_url: String::new(),
        read_time: "1 min read".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub(crate) fn numbered(n: usize) -> Vec<Post> {
    (0..n)
        .map(|i| post(&format!("p-{i}"), &format!("Post {i}"), &["Archive"]))
        .collect()
}

/// Vec-backed store that yields once per listing so concurrent callers interleave.
pub(crate) struct VecStore {
    pub posts: RwLock<Vec<Post>>,
    pub list_calls: AtomicUsize,
    pub fail_listing: bool,
    /// When set, listings past the first page wait for a notification.
    pub page_gate: Option<Arc<Notify>>,
}

impl VecStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            list_calls: AtomicUsize::new(0),
            fail_listing: false,
            page_gate: None,
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostStore for VecStore {
    async fn list_posts(&self, offset: usize, limit: usize) -> Result<Page<Post>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(gate) = self.page_gate.as_ref().filter(|_| offset > 0) {
            gate.notified().await;
        }
        if self.fail_listing {
            return Err(StoreError::Connection("offline".to_string()));
        }
        Ok(Page::slice(&self.posts.read().await, offset, limit))
    }

    async fn list_featured(&self) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().take(FEATURED_COUNT).cloned().collect())
    }

    async fn insert_post(&self, draft: PostDraft) -> Result<Post, StoreError> {
        let post = Post::from_draft(draft, chrono::Utc::now());
        self.posts.write().await.insert(0, post.clone());
        Ok(post)
    }

    async fn remove_post(&self, id: &PostId) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        if posts.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Generators returning fixed values and counting calls.
#[derive(Default)]
pub(crate) struct FixedGenerators {
    pub article_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

#[async_trait]
impl ContentGenerator for FixedGenerators {
    async fn generate_article(&self, title: &str) -> GeneratedArticle {
        self.article_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        GeneratedArticle {
            content: format!("All about {title}."),
            excerpt: "Short.".to_string(),
            tags: vec!["AI".to_string(), "Life".to_string()],
        }
    }
}

#[async_trait]
impl ImageGenerator for FixedGenerators {
    async fn generate_cover_image(&self, _title: &str) -> String {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        "data:image/png;base64,AAAA".to_string()
    }
}
