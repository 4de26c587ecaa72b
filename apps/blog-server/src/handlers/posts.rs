//! Post collection endpoints.

use actix_web::{HttpResponse, web};

use pratik_core::domain::{PostDraft, PostId};
use pratik_shared::ApiResponse;
use pratik_shared::dto::PageQuery;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

/// GET /api/posts?cursor=&limit=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let cursor = query.cursor();
    let limit = query.checked_limit().map_err(AppError::BadRequest)?;
    tracing::debug!(cursor, limit, "Listing posts");

    let page = state.posts.list_posts(cursor, limit).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/posts/featured
pub async fn featured_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_featured().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let draft = body.into_inner();

    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::Validation(
            missing.iter().map(|field| format!("{field} is required")).collect(),
        ));
    }

    let post = state.posts.insert_post(draft).await?;
    tracing::info!(request_id = request_id.as_str(), post_id = %post.id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(post, "Post created")))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    request_id: RequestId,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = PostId::new(path.into_inner());
    state.posts.remove_post(&id).await?;
    tracing::info!(request_id = request_id.as_str(), post_id = %id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}
