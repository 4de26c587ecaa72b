//! Gemini REST client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use pratik_core::ports::{ContentGenerator, GeneratedArticle, ImageGenerator, SpeechSynthesizer};
use pratik_core::speech::{MAX_SPEECH_CHARS, prepare_text};

use super::placeholder_cover;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub speech_model: String,
    pub voice: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            speech_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Read `GEMINI_API_KEY` (or `API_KEY`) and `GEMINI_BASE_URL`.
    ///
    /// Returns `None` when no key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        Some(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model returned no usable part")]
    Empty,

    #[error("Unparseable model output: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    /// First inline image as a `data:` URI.
    fn image_uri(&self) -> Option<String> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/"))
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }

    /// Inline data of the first part.
    fn first_inline_data(&self) -> Option<String> {
        self.parts()
            .next()
            .and_then(|p| p.inline_data.as_ref())
            .map(|d| d.data.clone())
            .filter(|data| !data.is_empty())
    }
}

/// Content, image and speech generation against the Gemini API.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn generate(&self, model: &str, body: Value) -> Result<GenerateResponse, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    async fn try_article(&self, title: &str) -> Result<GeneratedArticle, GeminiError> {
        let prompt = format!(
            "Write a creative and engaging blog post body (approx 150-200 words) for a blog titled \"{title}\".\n\
             Also provide a short excerpt (1 sentence) and 3 relevant tags.\n\
             Format the output as JSON with keys: \"content\", \"excerpt\", \"tags\".\n\
             Do not include markdown code blocks. Just raw JSON string."
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        });

        let response = self.generate(&self.config.text_model, body).await?;
        let text = response.text().ok_or(GeminiError::Empty)?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn try_cover(&self, title: &str) -> Result<String, GeminiError> {
        let prompt = format!(
            "Generate a high quality, artistic, futuristic digital art cover image for a blog post titled: \"{title}\". Use 16:9 aspect ratio."
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self.generate(&self.config.image_model, body).await?;
        response.image_uri().ok_or(GeminiError::Empty)
    }

    async fn try_speech(&self, text: &str) -> Result<String, GeminiError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": text }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": self.config.voice },
                    },
                },
            },
        });

        let response = self.generate(&self.config.speech_model, body).await?;
        response.first_inline_data().ok_or(GeminiError::Empty)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_article(&self, title: &str) -> GeneratedArticle {
        match self.try_article(title).await {
            Ok(article) => article,
            Err(e) => {
                tracing::error!(error = %e, title, "Article generation failed");
                GeneratedArticle::placeholder()
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_cover_image(&self, title: &str) -> String {
        match self.try_cover(title).await {
            Ok(uri) => uri,
            Err(GeminiError::Empty) => {
                tracing::warn!(title, "Model returned no image, using placeholder");
                placeholder_cover()
            }
            Err(e) => {
                tracing::error!(error = %e, title, "Cover generation failed");
                placeholder_cover()
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    async fn synthesize_speech(&self, text: &str) -> Option<String> {
        let prepared = prepare_text(text, MAX_SPEECH_CHARS);
        match self.try_speech(&prepared).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    chars = prepared.chars().count(),
                    "Speech synthesis failed"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_joins_parts() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "{\"content\":\"Body\"," },
                { "text": "\"excerpt\":\"E\",\"tags\":[\"a\"]}" }
            ]}}]
        }));
        let article: GeneratedArticle = serde_json::from_str(&r.text().unwrap()).unwrap();
        assert_eq!(article.content, "Body");
        assert_eq!(article.tags, vec!["a"]);
    }

    #[test]
    fn test_image_uri_skips_non_image_parts() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here you go" },
                { "inlineData": { "mimeType": "text/plain", "data": "eA==" } },
                { "inlineData": { "mimeType": "image/png", "data": "iVBO" } }
            ]}}]
        }));
        assert_eq!(r.image_uri().as_deref(), Some("data:image/png;base64,iVBO"));
    }

    #[test]
    fn test_missing_candidates_yield_nothing() {
        let r = response(json!({}));
        assert!(r.text().is_none());
        assert!(r.image_uri().is_none());
        assert!(r.first_inline_data().is_none());

        let r = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "no audio" }] } }]
        }));
        assert!(r.first_inline_data().is_none());
    }

    #[test]
    fn test_speech_data_comes_from_first_part() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAAA" } }
            ]}}]
        }));
        assert_eq!(r.first_inline_data().as_deref(), Some("AAAA"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails_open() {
        let mut config = GeminiConfig::new("test-key");
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout = Duration::from_secs(2);
        let client = GeminiClient::new(config).unwrap();

        assert_eq!(client.generate_article("T").await, GeneratedArticle::placeholder());
        assert!(client.generate_cover_image("T").await.starts_with("https://picsum.photos/"));
        assert_eq!(client.synthesize_speech("Hello").await, None);
    }
}
