//! # Atrium Infrastructure
//!
//! Concrete implementations of the ports defined in `atrium-core`:
//! SeaORM PostgreSQL repositories, in-memory repositories for tests and
//! database-less development, the single-entry result cache, and
//! filesystem blob storage.

pub mod cache;
pub mod database;
pub mod storage;

pub use cache::TimedSlot;
pub use database::{
    DatabaseConfig, InMemoryContentStore, InMemoryLiveCommentStore, PostgresCommentRepository,
    PostgresLiveCommentRepository, PostgresMediaRepository, PostgresPostRepository, connect,
};
pub use sea_orm::DbConn;
pub use storage::FsStorage;
