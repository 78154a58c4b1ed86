//! Floating live-comment stream.
//!
//! Clients poll GET /api/live every few seconds; the result is served
//! from a single-entry cache inside its TTL window and rebuilt on miss.
//! Writes invalidate the cache eagerly, so a freshly published comment is
//! visible on the next poll.

use actix_web::{HttpResponse, http::header::ContentType, web};

use atrium_core::domain::LiveComment;
use atrium_core::ports::{LiveCommentRepository, RecentCache};
use atrium_core::validate::require_non_empty;
use atrium_shared::dto::{
    LiveCommentListBody, LiveCommentMutationBody, MessageBody, PublishLiveCommentRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// How many comments a poll returns.
const LIVE_COMMENT_LIMIT: u64 = 50;

/// GET /api/live
pub async fn latest(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    if let Some(cached) = state.live_cache.get().await {
        return Ok(HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(cached));
    }

    let comments = state.live.latest(LIVE_COMMENT_LIMIT).await?;
    let body = LiveCommentListBody {
        success: true,
        comments: comments.into_iter().map(Into::into).collect(),
    };
    let serialized =
        serde_json::to_string(&body).map_err(|e| AppError::Internal(e.to_string()))?;

    state.live_cache.put(serialized.clone()).await;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(serialized))
}

/// POST /api/live
pub async fn publish(
    state: web::Data<AppState>,
    body: web::Json<PublishLiveCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    require_non_empty(&[("text", &req.text), ("name", &req.name)])?;

    let entry = state
        .live
        .insert(LiveComment::new(
            &req.text,
            &req.name,
            req.color.as_deref(),
            req.top,
        ))
        .await?;

    state.live_cache.invalidate().await;

    Ok(HttpResponse::Ok().json(LiveCommentMutationBody {
        success: true,
        comment: entry.into(),
    }))
}

/// DELETE /api/live - wipe the stream.
pub async fn clear(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let removed = state.live.clear().await?;
    state.live_cache.invalidate().await;

    tracing::debug!(removed, "Cleared live comments");

    Ok(HttpResponse::Ok().json(MessageBody {
        success: true,
        message: format!("Removed {} live comments", removed),
    }))
}
