//! Database connection management and repositories.

mod connections;
pub mod entity;
mod memory_repo;
mod postgres_base;
mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use memory_repo::{InMemoryContentStore, InMemoryLiveCommentStore};
pub use postgres_repo::{
    PostgresCommentRepository, PostgresLiveCommentRepository, PostgresMediaRepository,
    PostgresPostRepository,
};
