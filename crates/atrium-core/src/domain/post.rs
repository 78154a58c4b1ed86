//! Post entity and the derived presentation fields.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::media::Media;

/// Character cap for the list-view excerpt.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Reading-speed constant for the read-time estimate.
///
/// Both the create and update paths derive from this one value; it must
/// never drift between the two.
pub const READ_CHARS_PER_MINUTE: usize = 300;

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`{1,3}[\s\S]*?`{1,3}").expect("valid regex"));
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").expect("valid regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid regex"));
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|\*|_").expect("valid regex"));
static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip markdown/HTML markup from content, collapse whitespace, truncate
/// to [`EXCERPT_MAX_CHARS`] and append the ellipsis marker.
pub fn derive_excerpt(content: &str) -> String {
    let stripped = CODE_BLOCK_RE.replace_all(content, "");
    let stripped = IMAGE_RE.replace_all(&stripped, "");
    let stripped = LINK_RE.replace_all(&stripped, "");
    let stripped = HEADING_RE.replace_all(&stripped, "");
    let stripped = HTML_TAG_RE.replace_all(&stripped, "");
    let stripped = EMPHASIS_RE.replace_all(&stripped, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");

    let mut excerpt: String = collapsed.trim().chars().take(EXCERPT_MAX_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

/// Estimate reading time from content length, rounded up to whole minutes
/// (never below one), formatted as a "N min" label.
pub fn derive_read_time(content: &str) -> String {
    let chars = content.chars().count();
    let minutes = chars.div_ceil(READ_CHARS_PER_MINUTE).max(1);
    format!("{minutes} min")
}

/// Post entity - a blog article with derived presentation fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
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

impl Post {
    /// Create a new post. Derived fields are computed from the content;
    /// both timestamps are set to now.
    pub fn new(title: &str, content: &str, category: &str, author: &str) -> Self {
        let content = content.trim();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_owned(),
            content: content.to_owned(),
            category: category.trim().to_owned(),
            author: author.trim().to_owned(),
            excerpt: derive_excerpt(content),
            read_time: derive_read_time(content),
            read_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, re-derive excerpt and read time, and
    /// refresh `updated_at`. Id, `created_at` and `read_count` are kept.
    pub fn apply_update(&mut self, title: &str, content: &str, category: &str, author: &str) {
        let content = content.trim();
        self.title = title.trim().to_owned();
        self.content = content.to_owned();
        self.category = category.trim().to_owned();
        self.author = author.trim().to_owned();
        self.excerpt = derive_excerpt(content);
        self.read_time = derive_read_time(content);
        self.updated_at = Utc::now();
    }
}

/// Summary projection for list views: everything the card needs, never
/// the full content.
#[derive(Debug, Clone)]
pub struct PostSummary {
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
    pub first_media: Option<Media>,
}
