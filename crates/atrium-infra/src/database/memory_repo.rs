//! In-memory repositories - used when no database is configured (dev
//! mode) and as the fixture behind handler tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use atrium_core::domain::{Comment, LiveComment, Media, Post, PostSummary};
use atrium_core::error::RepoError;
use atrium_core::ports::{
    BaseRepository, CommentRepository, LiveCommentRepository, MediaRepository, PostRepository,
};

#[derive(Default)]
struct Tables {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    media: HashMap<Uuid, Media>,
}

/// All three content tables behind one lock, so the cascade delete keeps
/// its all-or-nothing visibility without a real transaction.
#[derive(Default)]
pub struct InMemoryContentStore {
    tables: RwLock<Tables>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&entity.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.posts.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryContentStore {
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.values().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .map(|post| {
                let comment_count = tables
                    .comments
                    .values()
                    .filter(|c| c.post_id == post.id)
                    .count() as i64;
                let first_media = tables
                    .media
                    .values()
                    .filter(|m| m.post_id == Some(post.id))
                    .min_by_key(|m| m.created_at)
                    .cloned();
                PostSummary {
                    id: post.id,
                    title: post.title.clone(),
                    category: post.category.clone(),
                    author: post.author.clone(),
                    excerpt: post.excerpt.clone(),
                    read_time: post.read_time.clone(),
                    read_count: post.read_count,
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                    comment_count,
                    first_media,
                }
            })
            .collect())
    }

    async fn delete_with_dependents(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        tables.media.retain(|_, m| m.post_id != Some(id));
        Ok(())
    }

    async fn increment_read_count(&self, id: Uuid) -> Result<i32, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.read_count += 1;
        Ok(post.read_count)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryContentStore {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl BaseRepository<Media, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Media>, RepoError> {
        Ok(self.tables.read().await.media.get(&id).cloned())
    }

    async fn insert(&self, entity: Media) -> Result<Media, RepoError> {
        let mut tables = self.tables.write().await;
        tables.media.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Media) -> Result<Media, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.media.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        tables.media.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.media.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl MediaRepository for InMemoryContentStore {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Media>, RepoError> {
        let tables = self.tables.read().await;
        let mut media: Vec<Media> = tables
            .media
            .values()
            .filter(|m| m.post_id == Some(post_id))
            .cloned()
            .collect();
        media.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(media)
    }

    async fn attach(&self, id: Uuid, post_id: Uuid) -> Result<Media, RepoError> {
        let mut tables = self.tables.write().await;
        let media = tables.media.get_mut(&id).ok_or(RepoError::NotFound)?;
        media.post_id = Some(post_id);
        Ok(media.clone())
    }
}

/// In-memory live-comment store.
#[derive(Default)]
pub struct InMemoryLiveCommentStore {
    entries: RwLock<Vec<LiveComment>>,
}

impl InMemoryLiveCommentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LiveCommentRepository for InMemoryLiveCommentStore {
    async fn insert(&self, entry: LiveComment) -> Result<LiveComment, RepoError> {
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn latest(&self, limit: u64) -> Result<Vec<LiveComment>, RepoError> {
        let entries = self.entries.read().await;
        let mut latest: Vec<LiveComment> = entries.iter().cloned().collect();
        latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        latest.truncate(limit as usize);
        Ok(latest)
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let mut entries = self.entries.write().await;
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}
