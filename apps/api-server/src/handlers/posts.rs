//! Blog post handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use atrium_core::domain::Post;
use atrium_core::error::RepoError;
use atrium_core::ports::{BaseRepository, CommentRepository, MediaRepository, PostRepository};
use atrium_core::validate::require_non_empty;
use atrium_shared::dto::{
    CreatePostRequest, PostDetailBody, PostDetailResponse, PostListBody, PostMutationBody,
    ReadCountBody, SuccessBody, UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<Uuid>,
}

fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("post {} not found", id))
}

/// GET /api/posts - the summary collection, or one full post (with its
/// comments and media) when `id` is given.
pub async fn get_posts(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> AppResult<HttpResponse> {
    if let Some(id) = query.id {
        let post = state
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| post_not_found(id))?;
        let comments = state.comments.find_by_post_id(id).await?;
        let media = state.media.find_by_post_id(id).await?;

        return Ok(HttpResponse::Ok().json(PostDetailBody {
            post: PostDetailResponse {
                post: post.into(),
                comments: comments.into_iter().map(Into::into).collect(),
                media: media.into_iter().map(Into::into).collect(),
            },
        }));
    }

    let posts = state.posts.list_summaries().await?;

    Ok(HttpResponse::Ok().json(PostListBody {
        posts: posts.into_iter().map(Into::into).collect(),
    }))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate before any write
    require_non_empty(&[
        ("title", &req.title),
        ("content", &req.content),
        ("category", &req.category),
        ("author", &req.author),
    ])?;

    let post = state
        .posts
        .insert(Post::new(&req.title, &req.content, &req.category, &req.author))
        .await?;

    tracing::debug!(post_id = %post.id, "Created post");

    Ok(HttpResponse::Ok().json(PostMutationBody {
        success: true,
        post: post.into(),
    }))
}

/// PUT /api/posts
pub async fn update_post(
    state: web::Data<AppState>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    require_non_empty(&[
        ("title", &req.title),
        ("content", &req.content),
        ("category", &req.category),
        ("author", &req.author),
    ])?;

    let mut post = state
        .posts
        .find_by_id(req.id)
        .await?
        .ok_or_else(|| post_not_found(req.id))?;

    post.apply_update(&req.title, &req.content, &req.category, &req.author);
    let post = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(PostMutationBody {
        success: true,
        post: post.into(),
    }))
}

/// DELETE /api/posts?id=... - removes the post together with its comments
/// and media, all-or-nothing.
pub async fn delete_post(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> AppResult<HttpResponse> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("missing required query parameter: id".to_string()))?;

    state
        .posts
        .delete_with_dependents(id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => post_not_found(id),
            other => other.into(),
        })?;

    tracing::debug!(post_id = %id, "Deleted post with comments and media");

    Ok(HttpResponse::Ok().json(SuccessBody { success: true }))
}

/// POST /api/posts/read?id=... - bump the view counter.
pub async fn record_read(
    state: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> AppResult<HttpResponse> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("missing required query parameter: id".to_string()))?;

    let read_count = state
        .posts
        .increment_read_count(id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => post_not_found(id),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(ReadCountBody {
        success: true,
        read_count,
    }))
}
