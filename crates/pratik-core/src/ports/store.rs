use async_trait::async_trait;

use crate::domain::{Page, Post, PostDraft, PostId};
use crate::error::StoreError;

/// Number of posts in the featured subset.
pub const FEATURED_COUNT: usize = 5;

/// Backing store for posts.
///
/// Listing is offset-paginated without snapshot isolation: inserts and
/// removals between two calls shift the offsets, so a later page may skip or
/// repeat items relative to the first listing.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// List up to `limit` posts starting at `offset`.
    async fn list_posts(&self, offset: usize, limit: usize) -> Result<Page<Post>, StoreError>;

    /// The first [`FEATURED_COUNT`] posts of the collection.
    async fn list_featured(&self) -> Result<Vec<Post>, StoreError>;

    /// Insert a draft at the head of the collection.
    async fn insert_post(&self, draft: PostDraft) -> Result<Post, StoreError>;

    /// Remove a post by id.
    async fn remove_post(&self, id: &PostId) -> Result<(), StoreError>;
}
