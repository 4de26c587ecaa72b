//! Generative endpoints. Failures degrade to fallbacks, never to errors.

use actix_web::{HttpResponse, web};

use pratik_core::authoring::TITLE_REQUIRED;
use pratik_shared::ApiResponse;
use pratik_shared::dto::{
    ArticleResponse, CoverImageResponse, GenerateRequest, SpeechRequest, SpeechResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn required_title(body: &GenerateRequest) -> AppResult<&str> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(vec![TITLE_REQUIRED.to_string()]));
    }
    Ok(title)
}

/// POST /api/ai/article
pub async fn generate_article(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let title = required_title(&body)?;
    let article = state.articles.generate_article(title).await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ArticleResponse {
        content: article.content,
        excerpt: article.excerpt,
        tags: article.tags,
    })))
}

/// POST /api/ai/cover
pub async fn generate_cover(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let title = required_title(&body)?;
    let image_url = state.covers.generate_cover_image(title).await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CoverImageResponse { image_url })))
}

/// POST /api/ai/speech
///
/// `audio` is null when nothing was synthesized.
pub async fn synthesize_speech(
    state: web::Data<AppState>,
    body: web::Json<SpeechRequest>,
) -> HttpResponse {
    let audio = state.speech.synthesize_speech(&body.text).await;
    tracing::debug!(synthesized = audio.is_some(), "Speech request served");

    HttpResponse::Ok().json(ApiResponse::ok(SpeechResponse { audio }))
}
