//! Floating live comment (the homepage "danmaku" stream).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default display color when the client sends none.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// A short floating comment, independent of any post. Read through a
/// single-entry cache, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveComment {
    pub id: Uuid,
    pub text: String,
    pub name: String,
    pub color: String,
    /// Vertical position hint in percent (0-100).
    pub top: f64,
    pub created_at: DateTime<Utc>,
}

impl LiveComment {
    pub fn new(text: &str, name: &str, color: Option<&str>, top: Option<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.trim().to_owned(),
            name: name.trim().to_owned(),
            color: color.unwrap_or(DEFAULT_COLOR).to_owned(),
            top: top.unwrap_or(0.0).clamp(0.0, 100.0),
            created_at: Utc::now(),
        }
    }
}
