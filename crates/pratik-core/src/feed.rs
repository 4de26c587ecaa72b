//! Infinite-scroll feed over a [`PostStore`].
//!
//! The feed owns the client-side view of the collection: the posts paged in
//! so far, the featured subset, the continuation cursor, the search query
//! and the currently opened post. Pages are fetched one at a time; a fetch
//! issued before a [`Feed::refresh`] is discarded when it completes.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{Post, PostDraft, PostId};
use crate::error::StoreError;
use crate::ports::PostStore;

/// Posts requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Largest page the blog server accepts.
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Self {
        Self {
            page_size: page_size(std::env::var("PAGE_SIZE").ok().as_deref()),
        }
    }
}

/// Parses `PAGE_SIZE`, falling back to the default outside `1..=MAX_PAGE_SIZE`.
fn page_size(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_PAGE_SIZE;
    };
    match raw.trim().parse::<usize>() {
        Ok(size) if (1..=MAX_PAGE_SIZE).contains(&size) => size,
        _ => {
            tracing::warn!(
                value = raw,
                max = MAX_PAGE_SIZE,
                "Ignoring invalid PAGE_SIZE"
            );
            DEFAULT_PAGE_SIZE
        }
    }
}

/// Result of a request for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was appended.
    Loaded { added: usize },
    /// Nothing was fetched.
    Skipped(SkipReason),
    /// The page arrived after a refresh and was dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another page fetch is outstanding.
    InFlight,
    /// The collection has no further pages.
    Exhausted,
    /// The initial load has not finished.
    InitialLoad,
}

/// What the list area should currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Initial load in progress.
    Loading,
    /// No post matches.
    Empty,
    /// Results for an active query; pagination suspended.
    Filtered,
    /// Unfiltered list with a loading sentinel below it.
    HasMore,
    /// Unfiltered list, everything paged in.
    EndOfCollection,
}

struct FeedState {
    posts: Vec<Post>,
    featured: Vec<Post>,
    cursor: usize,
    has_more: bool,
    initial_loading: bool,
    loading_more: bool,
    query: String,
    open_post: Option<Post>,
    sentinel_visible: bool,
    epoch: u64,
}

impl FeedState {
    fn filtering(&self) -> bool {
        !self.query.is_empty()
    }

    fn visible_posts(&self) -> Vec<Post> {
        let needle = self.query.to_lowercase();
        self.posts
            .iter()
            .filter(|post| post.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    fn has_visible_posts(&self) -> bool {
        let needle = self.query.to_lowercase();
        self.posts.iter().any(|post| post.matches_lowercase(&needle))
    }
}

/// Client-side feed controller.
pub struct Feed {
    store: Arc<dyn PostStore>,
    config: FeedConfig,
    state: RwLock<FeedState>,
}

impl Feed {
    pub fn new(store: Arc<dyn PostStore>, config: FeedConfig) -> Self {
        Self {
            store,
            config,
            state: RwLock::new(FeedState {
                posts: Vec::new(),
                featured: Vec::new(),
                cursor: 0,
                has_more: true,
                initial_loading: true,
                loading_more: false,
                query: String::new(),
                open_post: None,
                sentinel_visible: false,
                epoch: 0,
            }),
        }
    }

    /// Reset to the first page and reload the featured subset.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        let epoch = {
            let mut state = self.state.write().await;
            state.epoch += 1;
            state.initial_loading = true;
            state.cursor = 0;
            state.posts.clear();
            state.sentinel_visible = false;
            state.epoch
        };

        let result = match self.store.list_featured().await {
            Ok(featured) => self
                .store
                .list_posts(0, self.config.page_size)
                .await
                .map(|page| (featured, page)),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!(epoch, "Superseded refresh discarded");
            return Ok(());
        }
        state.initial_loading = false;

        let (featured, page) = result.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to load feed");
        })?;
        tracing::debug!(
            featured = featured.len(),
            posts = page.data.len(),
            has_more = page.has_more,
            "Feed loaded"
        );
        state.featured = featured;
        state.posts = page.data;
        state.cursor = page.next_cursor.unwrap_or(0);
        state.has_more = page.has_more;
        Ok(())
    }

    /// Fetch the next page and append it.
    ///
    /// At most one page fetch is outstanding; concurrent calls are skipped.
    pub async fn load_more(&self) -> Result<LoadOutcome, StoreError> {
        let (cursor, epoch) = {
            let mut state = self.state.write().await;
            if state.initial_loading {
                return Ok(LoadOutcome::Skipped(SkipReason::InitialLoad));
            }
            if state.loading_more {
                return Ok(LoadOutcome::Skipped(SkipReason::InFlight));
            }
            if !state.has_more {
                return Ok(LoadOutcome::Skipped(SkipReason::Exhausted));
            }
            state.loading_more = true;
            (state.cursor, state.epoch)
        };

        tracing::debug!(cursor, limit = self.config.page_size, "Loading next page");
        let result = self.store.list_posts(cursor, self.config.page_size).await;

        let mut state = self.state.write().await;
        state.loading_more = false;
        if state.epoch != epoch {
            tracing::debug!(cursor, "Page arrived after refresh; discarded");
            return Ok(LoadOutcome::Discarded);
        }
        // New content moves the sentinel, so its next report is a fresh transition.
        state.sentinel_visible = false;

        let page = result?;
        let added = page.data.len();
        state.posts.extend(page.data);
        state.has_more = page.has_more;
        if let Some(next) = page.next_cursor {
            state.cursor = next;
        }
        Ok(LoadOutcome::Loaded { added })
    }

    /// Visibility report for the end-of-list sentinel.
    ///
    /// Loads the next page on a hidden-to-visible transition, unless a query
    /// is active, the initial load is running, a page fetch is in flight, or
    /// the collection is exhausted. Returns `None` when no load was attempted.
    pub async fn on_sentinel_visibility(
        &self,
        visible: bool,
    ) -> Result<Option<LoadOutcome>, StoreError> {
        {
            let mut state = self.state.write().await;
            let was_visible = std::mem::replace(&mut state.sentinel_visible, visible);
            if !visible || was_visible {
                return Ok(None);
            }
            if state.filtering()
                || state.initial_loading
                || state.loading_more
                || !state.has_more
            {
                return Ok(None);
            }
        }
        self.load_more().await.map(Some)
    }

    /// Publish a draft and put the new post at the head of the list.
    pub async fn create(&self, draft: PostDraft) -> Result<Post, StoreError> {
        let post = self.store.insert_post(draft).await?;
        tracing::info!(post_id = %post.id, "Post created");
        self.state.write().await.posts.insert(0, post.clone());
        Ok(post)
    }

    /// Delete a post from the store and from every local list.
    ///
    /// Returns true when the deleted post was the open one, which is closed.
    pub async fn delete(&self, id: &PostId) -> Result<bool, StoreError> {
        match self.store.remove_post(id).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                tracing::debug!(post_id = %id, "Post already gone from store");
            }
            Err(e) => return Err(e),
        }

        let mut state = self.state.write().await;
        state.posts.retain(|p| &p.id != id);
        state.featured.retain(|p| &p.id != id);
        let was_open = state.open_post.as_ref().is_some_and(|p| &p.id == id);
        if was_open {
            state.open_post = None;
        }
        tracing::info!(post_id = %id, was_open, "Post deleted");
        Ok(was_open)
    }

    /// Open a post already present in the list or the featured subset.
    pub async fn open(&self, id: &PostId) -> Option<Post> {
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter()
            .chain(state.featured.iter())
            .find(|p| &p.id == id)
            .cloned()?;
        state.open_post = Some(post.clone());
        Some(post)
    }

    pub async fn close_post(&self) {
        self.state.write().await.open_post = None;
    }

    pub async fn open_post(&self) -> Option<Post> {
        self.state.read().await.open_post.clone()
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.query = query.into();
    }

    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    /// Loaded posts matching the query (all of them when the query is empty).
    pub async fn visible_posts(&self) -> Vec<Post> {
        self.state.read().await.visible_posts()
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.state.read().await.posts.clone()
    }

    pub async fn featured(&self) -> Vec<Post> {
        self.state.read().await.featured.clone()
    }

    /// Whether the featured carousel is shown (hidden while searching).
    pub async fn shows_featured(&self) -> bool {
        let state = self.state.read().await;
        !state.filtering() && !state.featured.is_empty()
    }

    pub async fn cursor(&self) -> usize {
        self.state.read().await.cursor
    }

    pub async fn has_more(&self) -> bool {
        self.state.read().await.has_more
    }

    pub async fn is_loading_more(&self) -> bool {
        self.state.read().await.loading_more
    }

    pub async fn status(&self) -> FeedStatus {
        let state = self.state.read().await;
        if state.initial_loading {
            FeedStatus::Loading
        } else if !state.has_visible_posts() {
            FeedStatus::Empty
        } else if state.filtering() {
            FeedStatus::Filtered
        } else if state.has_more {
            FeedStatus::HasMore
        } else {
            FeedStatus::EndOfCollection
        }
    }
}
