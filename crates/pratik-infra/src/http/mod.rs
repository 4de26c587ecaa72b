//! Clients for the blog server's HTTP API.

mod generation;
mod store;

pub use generation::HttpGenerationClient;
pub use store::HttpPostStore;

use std::time::Duration;

use serde::de::DeserializeOwned;

use pratik_shared::{ApiResponse, ErrorResponse};

/// Connection settings shared by the API clients.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Read `BLOG_API_URL`; `None` when unset.
    pub fn from_env() -> Option<Self> {
        std::env::var("BLOG_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of `segments` under the base, each segment percent-encoded.
    fn segments_url(&self, segments: &[&str]) -> Result<reqwest::Url, String> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|()| format!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Failure talking to the API, before it is mapped onto a port error.
#[derive(Debug)]
enum ApiFailure {
    Transport(reqwest::Error),
    Problem(ErrorResponse),
    Decode(String),
}

impl std::fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiFailure::Transport(e) => write!(f, "{e}"),
            ApiFailure::Problem(problem) => write!(f, "{}", problem.summary()),
            ApiFailure::Decode(msg) => write!(f, "{msg}"),
        }
    }
}

/// Problem document of a failed response, synthesized when the body is not one.
async fn problem(response: reqwest::Response) -> ApiFailure {
    let status = response.status();
    let problem = response
        .json::<ErrorResponse>()
        .await
        .unwrap_or_else(|_| ErrorResponse::new(status.as_u16(), status.to_string()));
    ApiFailure::Problem(problem)
}

/// Read an `ApiResponse<T>` envelope, or the problem document on failure.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiFailure> {
    if !response.status().is_success() {
        return Err(problem(response).await);
    }

    response
        .json::<ApiResponse<T>>()
        .await
        .map_err(|e| ApiFailure::Decode(e.to_string()))?
        .into_data()
        .map_err(ApiFailure::Decode)
}
