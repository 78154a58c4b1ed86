//! Application state - shared across all handlers.

use std::sync::Arc;

use atrium_core::ports::{
    BlobStorage, CommentRepository, LiveCommentRepository, MediaRepository, PostRepository,
    RecentCache,
};
use atrium_infra::{
    DbConn, FsStorage, InMemoryContentStore, InMemoryLiveCommentStore,
    PostgresCommentRepository, PostgresLiveCommentRepository, PostgresMediaRepository,
    PostgresPostRepository, TimedSlot, connect,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub live: Arc<dyn LiveCommentRepository>,
    pub storage: Arc<dyn BlobStorage>,
    pub live_cache: Arc<dyn RecentCache>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(conn) => return Self::with_postgres(conn, config),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        Self::with_memory(config)
    }

    fn with_postgres(conn: DbConn, config: &AppConfig) -> Self {
        Self {
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            media: Arc::new(PostgresMediaRepository::new(conn.clone())),
            live: Arc::new(PostgresLiveCommentRepository::new(conn)),
            storage: Arc::new(FsStorage::new(
                &config.upload.dir,
                &config.upload.public_prefix,
            )),
            live_cache: Arc::new(TimedSlot::new(config.live_cache_ttl)),
        }
    }

    /// In-memory variant: dev mode without a database, and the fixture
    /// behind handler tests.
    pub fn with_memory(config: &AppConfig) -> Self {
        let content = Arc::new(InMemoryContentStore::new());
        Self {
            posts: content.clone(),
            comments: content.clone(),
            media: content,
            live: Arc::new(InMemoryLiveCommentStore::new()),
            storage: Arc::new(FsStorage::new(
                &config.upload.dir,
                &config.upload.public_prefix,
            )),
            live_cache: Arc::new(TimedSlot::new(config.live_cache_ttl)),
        }
    }
}
