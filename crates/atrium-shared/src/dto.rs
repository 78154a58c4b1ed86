//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire, matching what the site's
//! frontend sends and expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atrium_core::domain::{Comment, LiveComment, Media, Post, PostSummary};

// ---------------------------------------------------------------------------
// Requests

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
}

/// Request to update a post. The id picks the row; everything else
/// replaces the stored fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
}

/// Request to add a comment to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
}

/// Request to attach an uploaded media row to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMediaRequest {
    pub post_id: Uuid,
}

/// Request to publish a floating live comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishLiveCommentRequest {
    pub text: String,
    pub name: String,
    pub color: Option<String>,
    pub top: Option<f64>,
}

// ---------------------------------------------------------------------------
// Entity projections

/// Full post representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub excerpt: String,
    pub read_time: String,
    pub read_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            category: post.category,
            author: post.author,
            excerpt: post.excerpt,
            read_time: post.read_time,
            read_count: post.read_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// List-view projection: excerpt instead of content, plus comment count
/// and the first media preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub author: String,
    pub excerpt: String,
    pub read_time: String,
    pub read_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comment_count: i64,
    pub first_media: Option<MediaResponse>,
}

impl From<PostSummary> for PostSummaryResponse {
    fn from(summary: PostSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            category: summary.category,
            author: summary.author,
            excerpt: summary.excerpt,
            read_time: summary.read_time,
            read_count: summary.read_count,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
            comment_count: summary.comment_count,
            first_media: summary.first_media.map(Into::into),
        }
    }
}

/// Comment representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Media representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Media> for MediaResponse {
    fn from(media: Media) -> Self {
        Self {
            id: media.id,
            media_type: media.media_type,
            url: media.url,
            filename: media.filename,
            original_name: media.original_name,
            post_id: media.post_id,
            created_at: media.created_at,
        }
    }
}

/// Detail view: the full post plus its comments (newest first) and media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub media: Vec<MediaResponse>,
}

/// Floating live comment representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveCommentResponse {
    pub id: Uuid,
    pub text: String,
    pub name: String,
    pub color: String,
    pub top: f64,
    pub created_at: DateTime<Utc>,
}

impl From<LiveComment> for LiveCommentResponse {
    fn from(entry: LiveComment) -> Self {
        Self {
            id: entry.id,
            text: entry.text,
            name: entry.name,
            color: entry.color,
            top: entry.top,
            created_at: entry.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelopes

/// `GET /api/posts` (collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListBody {
    pub posts: Vec<PostSummaryResponse>,
}

/// `GET /api/posts?id=...` (single).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailBody {
    pub post: PostDetailResponse,
}

/// Create/update post result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMutationBody {
    pub success: bool,
    pub post: PostResponse,
}

/// Bare success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

/// Success acknowledgement with a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

/// `GET /api/comments?postId=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentListBody {
    pub success: bool,
    pub comments: Vec<CommentResponse>,
}

/// Comment creation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentMutationBody {
    pub success: bool,
    pub comment: CommentResponse,
}

/// The stored-file part of an upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFileBody {
    pub id: Uuid,
    pub filename: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Upload result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadBody {
    pub success: bool,
    pub file: UploadedFileBody,
}

/// Attach result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMutationBody {
    pub success: bool,
    pub media: MediaResponse,
}

/// Read-count increment result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadCountBody {
    pub success: bool,
    pub read_count: i32,
}

/// `GET /api/live`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveCommentListBody {
    pub success: bool,
    pub comments: Vec<LiveCommentResponse>,
}

/// Live-comment publication result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveCommentMutationBody {
    pub success: bool,
    pub comment: LiveCommentResponse,
}
