use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, LiveComment, Media, Post, PostSummary};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `insert` and `update` are distinct on purpose: entities mint their ids
/// in `new()`, so an upsert-style `save` could never tell a create from an
/// update of a missing row.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity. `RepoError::NotFound` when
    /// no row matches the entity's id.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. `RepoError::NotFound` when absent.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Summary projection of every post, newest first, with comment count
    /// and first-media preview. Never loads full content.
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError>;

    /// Delete a post together with its comments and media rows, as one
    /// all-or-nothing unit. `RepoError::NotFound` (and no writes) when the
    /// post does not exist - including on a repeated delete.
    async fn delete_with_dependents(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomically bump the view counter, returning the new value.
    async fn increment_read_count(&self, id: Uuid) -> Result<i32, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments for a post, newest first.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Media repository.
#[async_trait]
pub trait MediaRepository: BaseRepository<Media, Uuid> {
    /// All media rows owned by a post.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Media>, RepoError>;

    /// Point a previously-uploaded media row at a post. Idempotent for the
    /// same target; last-write-wins for a different one.
    async fn attach(&self, id: Uuid, post_id: Uuid) -> Result<Media, RepoError>;
}

/// Live-comment repository. Append, latest-N, and clear-all only; there is
/// no per-row update or delete surface.
#[async_trait]
pub trait LiveCommentRepository: Send + Sync {
    async fn insert(&self, comment: LiveComment) -> Result<LiveComment, RepoError>;

    /// Most recent comments, newest first, capped at `limit`.
    async fn latest(&self, limit: u64) -> Result<Vec<LiveComment>, RepoError>;

    /// Remove every live comment, returning how many were deleted.
    async fn clear(&self) -> Result<u64, RepoError>;
}
