use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use pratik_core::ports::{ContentGenerator, GeneratedArticle, ImageGenerator, SpeechSynthesizer};
use pratik_shared::dto::{
    ArticleResponse, CoverImageResponse, GenerateRequest, SpeechRequest, SpeechResponse,
};

use super::{ApiConfig, ApiFailure, read_envelope};
use crate::generation::placeholder_cover;

/// Generative ports proxied through the blog server's `/api/ai` routes.
pub struct HttpGenerationClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl HttpGenerationClient {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn call<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiFailure> {
        let response = self
            .client
            .post(self.config.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiFailure::Transport)?;
        read_envelope(response).await
    }
}

#[async_trait]
impl ContentGenerator for HttpGenerationClient {
    async fn generate_article(&self, title: &str) -> GeneratedArticle {
        let request = GenerateRequest {
            title: title.to_string(),
        };
        match self.call::<_, ArticleResponse>("/api/ai/article", &request).await {
            Ok(article) => GeneratedArticle {
                content: article.content,
                excerpt: article.excerpt,
                tags: article.tags,
            },
            Err(e) => {
                tracing::error!(error = %e, title, "Article generation request failed");
                GeneratedArticle::placeholder()
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpGenerationClient {
    async fn generate_cover_image(&self, title: &str) -> String {
        let request = GenerateRequest {
            title: title.to_string(),
        };
        match self.call::<_, CoverImageResponse>("/api/ai/cover", &request).await {
            Ok(cover) => cover.image_url,
            Err(e) => {
                tracing::error!(error = %e, title, "Cover generation request failed");
                placeholder_cover()
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpGenerationClient {
    async fn synthesize_speech(&self, text: &str) -> Option<String> {
        let request = SpeechRequest {
            text: text.to_string(),
        };
        match self.call::<_, SpeechResponse>("/api/ai/speech", &request).await {
            Ok(speech) => speech.audio,
            Err(e) => {
                tracing::error!(error = %e, "Speech request failed");
                None
            }
        }
    }
}
