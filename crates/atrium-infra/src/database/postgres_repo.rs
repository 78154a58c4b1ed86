//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, FromQueryResult,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionError,
    TransactionTrait,
};
use uuid::Uuid;

use atrium_core::domain::{Comment, LiveComment, Media, PostSummary};
use atrium_core::error::RepoError;
use atrium_core::ports::{
    CommentRepository, LiveCommentRepository, MediaRepository, PostRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::live_comment::{self, Entity as LiveCommentEntity};
use super::entity::media::{self, Entity as MediaEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_write_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL media repository.
pub type PostgresMediaRepository = PostgresBaseRepository<MediaEntity>;

/// Partial select for list views; full content is never read here.
#[derive(FromQueryResult)]
struct PostSummaryRow {
    id: Uuid,
    title: String,
    category: String,
    author: String,
    excerpt: String,
    read_time: String,
    read_count: i32,
    created_at: sea_orm::prelude::DateTimeWithTimeZone,
    updated_at: sea_orm::prelude::DateTimeWithTimeZone,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        let rows = PostEntity::find()
            .select_only()
            .columns([
                post::Column::Id,
                post::Column::Title,
                post::Column::Category,
                post::Column::Author,
                post::Column::Excerpt,
                post::Column::ReadTime,
                post::Column::ReadCount,
                post::Column::CreatedAt,
                post::Column::UpdatedAt,
            ])
            .order_by_desc(post::Column::CreatedAt)
            .into_model::<PostSummaryRow>()
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let counts: HashMap<Uuid, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "count")
            .group_by(comment::Column::PostId)
            .into_tuple::<(Uuid, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .into_iter()
            .collect();

        let mut previews: HashMap<Uuid, Media> = HashMap::new();
        let media_rows = MediaEntity::find()
            .filter(media::Column::PostId.is_not_null())
            .order_by_asc(media::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        for row in media_rows {
            if let Some(post_id) = row.post_id {
                previews.entry(post_id).or_insert_with(|| row.into());
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| PostSummary {
                comment_count: counts.get(&row.id).copied().unwrap_or(0),
                first_media: previews.remove(&row.id),
                id: row.id,
                title: row.title,
                category: row.category,
                author: row.author,
                excerpt: row.excerpt,
                read_time: row.read_time,
                read_count: row.read_count,
                created_at: row.created_at.into(),
                updated_at: row.updated_at.into(),
            })
            .collect())
    }

    async fn delete_with_dependents(&self, id: Uuid) -> Result<(), RepoError> {
        self.db
            .transaction::<_, (), RepoError>(|txn| {
                Box::pin(async move {
                    let existing = PostEntity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(|e| RepoError::Query(e.to_string()))?;
                    if existing.is_none() {
                        return Err(RepoError::NotFound);
                    }

                    CommentEntity::delete_many()
                        .filter(comment::Column::PostId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(|e| RepoError::Query(e.to_string()))?;

                    MediaEntity::delete_many()
                        .filter(media::Column::PostId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(|e| RepoError::Query(e.to_string()))?;

                    PostEntity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(|e| RepoError::Query(e.to_string()))?;

                    Ok(())
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db) => RepoError::Query(db.to_string()),
                TransactionError::Transaction(repo) => repo,
            })
    }

    async fn increment_read_count(&self, id: Uuid) -> Result<i32, RepoError> {
        // Single-statement increment; concurrent reads never lose a count.
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"UPDATE "posts" SET "read_count" = "read_count" + 1 WHERE "id" = $1"#,
            [id.into()],
        );
        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        let refreshed = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(refreshed.map(|m| m.read_count).unwrap_or_default())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Media>, RepoError> {
        let result = MediaEntity::find()
            .filter(media::Column::PostId.eq(post_id))
            .order_by_asc(media::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn attach(&self, id: Uuid, post_id: Uuid) -> Result<Media, RepoError> {
        let model = MediaEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .ok_or(RepoError::NotFound)?;

        // Re-attaching to the same post is a no-op.
        if model.post_id == Some(post_id) {
            return Ok(model.into());
        }

        let mut active = model.into_active_model();
        active.post_id = Set(Some(post_id));
        let updated = active.update(&self.db).await.map_err(map_write_err)?;

        Ok(updated.into())
    }
}

/// PostgreSQL live-comment repository.
pub struct PostgresLiveCommentRepository {
    db: DbConn,
}

impl PostgresLiveCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LiveCommentRepository for PostgresLiveCommentRepository {
    async fn insert(&self, entry: LiveComment) -> Result<LiveComment, RepoError> {
        let active: live_comment::ActiveModel = entry.into();
        let model = active.insert(&self.db).await.map_err(map_write_err)?;

        Ok(model.into())
    }

    async fn latest(&self, limit: u64) -> Result<Vec<LiveComment>, RepoError> {
        let result = LiveCommentEntity::find()
            .order_by_desc(live_comment::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let result = LiveCommentEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
