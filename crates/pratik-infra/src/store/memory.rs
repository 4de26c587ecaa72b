//! In-memory post store used by the blog server.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use pratik_core::domain::{Page, Post, PostDraft, PostId};
use pratik_core::ports::{FEATURED_COUNT, PostStore};
use pratik_core::StoreError;

use super::seed;

/// Ordered post collection behind an async RwLock, newest first.
///
/// An optional latency is slept before every operation to imitate a remote
/// backend. Data is lost on process restart.
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
    latency: Option<Duration>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            latency: None,
        }
    }

    /// The curated posts followed by `archive_count` generated ones.
    pub fn seeded(archive_count: usize) -> Self {
        let mut posts = seed::curated_posts();
        posts.extend(seed::archive_posts(&mut rand::thread_rng(), archive_count));
        tracing::info!(total = posts.len(), "Seeded in-memory post store");
        Self::with_posts(posts)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn list_posts(&self, offset: usize, limit: usize) -> Result<Page<Post>, StoreError> {
        if limit == 0 {
            return Err(StoreError::Rejected("limit must be positive".to_string()));
        }
        self.simulate_latency().await;

        let posts = self.posts.read().await;
        Ok(Page::slice(&posts, offset, limit))
    }

    async fn list_featured(&self) -> Result<Vec<Post>, StoreError> {
        self.simulate_latency().await;
        let posts = self.posts.read().await;
        Ok(posts.iter().take(FEATURED_COUNT).cloned().collect())
    }

    async fn insert_post(&self, draft: PostDraft) -> Result<Post, StoreError> {
        self.simulate_latency().await;
        let post = Post::from_draft(draft, Utc::now());

        let mut posts = self.posts.write().await;
        posts.insert(0, post.clone());
        tracing::debug!(post_id = %post.id, total = posts.len(), "Post inserted");
        Ok(post)
    }

    async fn remove_post(&self, id: &PostId) -> Result<(), StoreError> {
        self.simulate_latency().await;
        let mut posts = self.posts.write().await;

        let index = posts
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        posts.remove(index);
        tracing::debug!(post_id = %id, total = posts.len(), "Post removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            author: "Tester".to_string(),
            content: "Body".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_pages_walk_the_seeded_collection() {
        let store = InMemoryPostStore::seeded(20);
        assert_eq!(store.len().await, 25);

        let first = store.list_posts(0, 6).await.unwrap();
        assert_eq!(first.data.len(), 6);
        assert_eq!(first.next_cursor, Some(6));
        assert_eq!(first.data[0].id.as_str(), "1");

        let last = store.list_posts(24, 6).await.unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.has_more);
        assert_eq!(last.next_cursor, None);

        let past_end = store.list_posts(100, 6).await.unwrap();
        assert!(past_end.data.is_empty());
        assert!(!past_end.has_more);
    }

    #[tokio::test]
    async fn test_exact_boundary_has_no_more() {
        let store = InMemoryPostStore::seeded(7);
        let page = store.list_posts(6, 6).await.unwrap();
        assert_eq!(page.data.len(), 6);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let store = InMemoryPostStore::seeded(0);
        assert!(matches!(
            store.list_posts(0, 0).await,
            Err(StoreError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_prepends_and_shifts_featured() {
        let store = InMemoryPostStore::seeded(3);
        let post = store.insert_post(draft("Fresh")).await.unwrap();

        let featured = store.list_featured().await.unwrap();
        assert_eq!(featured.len(), FEATURED_COUNT);
        assert_eq!(featured[0].id, post.id);
        assert_eq!(post.read_time, "1 min read");
    }

    #[tokio::test]
    async fn test_remove_missing_post() {
        let store = InMemoryPostStore::seeded(0);
        store.remove_post(&PostId::new("3")).await.unwrap();
        assert_eq!(store.len().await, 4);
        assert!(matches!(
            store.remove_post(&PostId::new("3")).await,
            Err(StoreError::NotFound(id)) if id == "3"
        ));
    }

    #[tokio::test]
    async fn test_offsets_shift_after_insert() {
        let store = InMemoryPostStore::seeded(10);
        let first = store.list_posts(0, 5).await.unwrap();
        store.insert_post(draft("Shifted")).await.unwrap();

        // The last post of the first page is listed again at the next offset.
        let second = store.list_posts(5, 5).await.unwrap();
        assert_eq!(second.data[0].id, first.data[4].id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let store = InMemoryPostStore::seeded(0).with_latency(Duration::from_millis(800));
        let started = tokio::time::Instant::now();
        store.list_featured().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
