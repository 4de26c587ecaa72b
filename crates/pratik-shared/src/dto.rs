//! Data Transfer Objects - request/response types for the blog API.

use serde::{Deserialize, Serialize};

/// Default page size when the client sends none.
pub const DEFAULT_LIMIT: usize = 6;

/// Largest page the server hands out.
pub const MAX_LIMIT: usize = 50;

/// Query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<usize>,
    pub limit: Option<usize>,
}

impl PageQuery {
    pub fn new(cursor: usize, limit: usize) -> Self {
        Self {
            cursor: Some(cursor),
            limit: Some(limit),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    /// Requested limit, defaulted to [`DEFAULT_LIMIT`].
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// The limit if it lies in `1..=MAX_LIMIT`.
    ///
    /// Out-of-range limits are refused rather than clamped, so the returned
    /// page's cursor always advances by the requested amount.
    pub fn checked_limit(&self) -> Result<usize, String> {
        match self.limit() {
            0 => Err("limit must be positive".to_string()),
            limit if limit > MAX_LIMIT => Err(format!("limit must not exceed {MAX_LIMIT}")),
            limit => Ok(limit),
        }
    }
}

/// Body of the generation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub title: String,
}

/// Response of `POST /api/ai/article`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

/// Response of `POST /api/ai/cover`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImageResponse {
    pub image_url: String,
}

/// Body of `POST /api/ai/speech`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// Response of `POST /api/ai/speech`; `audio` is base64 PCM or null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub audio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.cursor(), 0);
        assert_eq!(query.limit(), DEFAULT_LIMIT);
        assert_eq!(query.checked_limit(), Ok(DEFAULT_LIMIT));
    }

    #[test]
    fn test_out_of_range_limits_are_refused() {
        assert_eq!(PageQuery::new(0, MAX_LIMIT).checked_limit(), Ok(MAX_LIMIT));
        assert!(PageQuery::new(0, 0).checked_limit().is_err());

        let query = PageQuery::new(0, 60);
        assert_eq!(query.limit(), 60);
        assert_eq!(
            query.checked_limit(),
            Err("limit must not exceed 50".to_string())
        );
    }

    #[test]
    fn test_cover_response_is_camel_case() {
        let json = serde_json::to_string(&CoverImageResponse {
            image_url: "u".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"imageUrl":"u"}"#);
    }
}
