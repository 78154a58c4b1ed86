//! Comment entity - flat, per-post, append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reader comment attached to a post. Comments are never edited and
/// never outlive their post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment for an existing post.
    pub fn new(post_id: Uuid, author: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author: author.trim().to_owned(),
            content: content.trim().to_owned(),
            created_at: Utc::now(),
        }
    }
}
