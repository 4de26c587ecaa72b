use async_trait::async_trait;

use pratik_core::domain::{Page, Post, PostDraft, PostId};
use pratik_core::ports::PostStore;
use pratik_core::StoreError;
use pratik_shared::dto::PageQuery;

use super::{ApiConfig, ApiFailure, problem, read_envelope};

/// [`PostStore`] backed by the blog server.
pub struct HttpPostStore {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpPostStore {
    pub fn new(config: ApiConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { config, client })
    }
}

fn store_error(failure: ApiFailure) -> StoreError {
    match failure {
        ApiFailure::Transport(e) => StoreError::Connection(e.to_string()),
        ApiFailure::Problem(problem) if problem.status == 404 => {
            StoreError::NotFound(problem.detail.unwrap_or(problem.title))
        }
        ApiFailure::Problem(problem) => StoreError::Rejected(problem.summary()),
        ApiFailure::Decode(msg) => StoreError::Decode(msg),
    }
}

#[async_trait]
impl PostStore for HttpPostStore {
    async fn list_posts(&self, offset: usize, limit: usize) -> Result<Page<Post>, StoreError> {
        let query = PageQuery::new(offset, limit);
        query.checked_limit().map_err(StoreError::Rejected)?;
        tracing::debug!(offset, limit, "Fetching page");

        let response = self
            .client
            .get(self.config.url("/api/posts"))
            .query(&query)
            .send()
            .await
            .map_err(|e| store_error(ApiFailure::Transport(e)))?;
        read_envelope(response).await.map_err(store_error)
    }

    async fn list_featured(&self) -> Result<Vec<Post>, StoreError> {
        let response = self
            .client
            .get(self.config.url("/api/posts/featured"))
            .send()
            .await
            .map_err(|e| store_error(ApiFailure::Transport(e)))?;
        read_envelope(response).await.map_err(store_error)
    }

    async fn insert_post(&self, draft: PostDraft) -> Result<Post, StoreError> {
        let response = self
            .client
            .post(self.config.url("/api/posts"))
            .json(&draft)
            .send()
            .await
            .map_err(|e| store_error(ApiFailure::Transport(e)))?;
        read_envelope(response).await.map_err(store_error)
    }

    async fn remove_post(&self, id: &PostId) -> Result<(), StoreError> {
        let url = self
            .config
            .segments_url(&["api", "posts", id.as_str()])
            .map_err(StoreError::Connection)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| store_error(ApiFailure::Transport(e)))?;

        if response.status().is_success() {
            return Ok(());
        }
        Err(store_error(problem(response).await))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pratik_shared::ErrorResponse;

    use super::*;

    #[test]
    fn test_problem_status_maps_to_store_error() {
        let not_found = store_error(ApiFailure::Problem(ErrorResponse::not_found("gen-3")));
        assert!(matches!(not_found, StoreError::NotFound(id) if id == "gen-3"));

        let invalid = store_error(ApiFailure::Problem(ErrorResponse::unprocessable(
            "missing title",
        )));
        assert!(matches!(invalid, StoreError::Rejected(msg) if msg.contains("422")));
    }

    #[test]
    fn test_post_id_is_escaped_in_the_path() {
        let config = ApiConfig::new("http://localhost:8080/");
        let url = config.segments_url(&["api", "posts", "a/b?c#d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/posts/a%2Fb%3Fc%23d");

        let prefixed = ApiConfig::new("http://localhost:8080/blog");
        let url = prefixed.segments_url(&["api", "posts", "gen-4"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/blog/api/posts/gen-4");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_connection_error() {
        let mut config = ApiConfig::new("http://127.0.0.1:9/");
        config.timeout = Duration::from_secs(2);
        let store = HttpPostStore::new(config).unwrap();

        assert!(matches!(
            store.list_posts(0, 9).await,
            Err(StoreError::Connection(_))
        ));
        assert!(matches!(
            store.list_posts(0, 0).await,
            Err(StoreError::Rejected(_))
        ));
    }
}
