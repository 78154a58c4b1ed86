//! Comment handlers. Comments are append-only; the only delete is the
//! admin cleanup below.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use atrium_core::domain::Comment;
use atrium_core::error::RepoError;
use atrium_core::ports::{BaseRepository, CommentRepository};
use atrium_core::validate::require_non_empty;
use atrium_shared::dto::{
    CommentListBody, CommentMutationBody, CreateCommentRequest, MessageBody,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListQuery {
    post_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<Uuid>,
}

/// GET /api/comments?postId=... - newest first.
pub async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<CommentListQuery>,
) -> AppResult<HttpResponse> {
    let post_id = query.post_id.ok_or_else(|| {
        AppError::BadRequest("missing required query parameter: postId".to_string())
    })?;

    let comments = state.comments.find_by_post_id(post_id).await?;

    Ok(HttpResponse::Ok().json(CommentListBody {
        success: true,
        comments: comments.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    require_non_empty(&[("author", &req.author), ("content", &req.content)])?;

    // A comment never references a post that does not exist.
    state
        .posts
        .find_by_id(req.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", req.post_id)))?;

    let comment = state
        .comments
        .insert(Comment::new(req.post_id, &req.author, &req.content))
        .await?;

    Ok(HttpResponse::Ok().json(CommentMutationBody {
        success: true,
        comment: comment.into(),
    }))
}

/// DELETE /api/comments?id=... - admin cleanup.
pub async fn delete_comment(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> AppResult<HttpResponse> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("missing required query parameter: id".to_string()))?;

    state.comments.delete(id).await.map_err(|e| match e {
        RepoError::NotFound => AppError::NotFound(format!("comment {} not found", id)),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(MessageBody {
        success: true,
        message: "Comment deleted".to_string(),
    }))
}
