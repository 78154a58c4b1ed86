//! Media entity and the upload policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
const ALLOWED_VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/ogg", "video/quicktime"];

const IMAGE_MAX_BYTES: usize = 5 * 1024 * 1024;
const VIDEO_MAX_BYTES: usize = 50 * 1024 * 1024;

/// Media category derived from the MIME type. Determines the size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME type, or `None` when it is outside the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if ALLOWED_IMAGE_TYPES.contains(&mime) {
            Some(Self::Image)
        } else if ALLOWED_VIDEO_TYPES.contains(&mime) {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Upload size cap for this kind.
    pub const fn max_bytes(self) -> usize {
        match self {
            Self::Image => IMAGE_MAX_BYTES,
            Self::Video => VIDEO_MAX_BYTES,
        }
    }
}

/// Check an upload against the MIME allow-list and the per-kind size cap.
///
/// Runs before any byte reaches storage, so a rejected upload has no side
/// effect.
pub fn validate_upload(mime: &str, size: usize) -> Result<MediaKind, DomainError> {
    let kind = MediaKind::from_mime(mime)
        .ok_or_else(|| DomainError::UnsupportedMedia(format!("unsupported media type: {mime}")))?;
    if size > kind.max_bytes() {
        return Err(DomainError::UnsupportedMedia(format!(
            "file of {size} bytes exceeds the {} byte limit",
            kind.max_bytes()
        )));
    }
    Ok(kind)
}

/// Generate a collision-resistant storage filename: millisecond timestamp
/// plus a random suffix, with an extension recovered from the original
/// name (or the MIME type when the name has none).
pub fn storage_filename(original_name: &str, mime: &str) -> String {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| extension_for_mime(mime).to_owned());
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/ogg" => "ogv",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Media entity - an uploaded binary asset, optionally owned by a post.
///
/// The storage locator (`url`) is immutable after creation; `post_id`
/// starts out null for draft uploads and is set by the attach operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: Uuid,
    pub media_type: String,
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Media {
    /// Record a stored upload.
    pub fn new(
        media_type: &str,
        url: &str,
        filename: &str,
        original_name: &str,
        post_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            media_type: media_type.to_owned(),
            url: url.to_owned(),
            filename: filename.to_owned(),
            original_name: original_name.to_owned(),
            post_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_allowed_mime_types() {
        assert_eq!(MediaKind::from_mime("image/png"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_mime("video/mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_mime("application/pdf"), None);
        assert_eq!(MediaKind::from_mime("image/svg+xml"), None);
    }

    #[test]
    fn rejects_oversized_image_before_any_write() {
        let err = validate_upload("image/png", 6 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedMedia(_)));
    }

    #[test]
    fn video_cap_is_larger_than_image_cap() {
        assert!(validate_upload("video/mp4", 20 * 1024 * 1024).is_ok());
        assert!(validate_upload("image/jpeg", 20 * 1024 * 1024).is_err());
    }

    #[test]
    fn generated_filenames_do_not_collide() {
        let a = storage_filename("photo.PNG", "image/png");
        let b = storage_filename("photo.PNG", "image/png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn extension_falls_back_to_mime_type() {
        let name = storage_filename("clip", "video/quicktime");
        assert!(name.ends_with(".mov"));
        let name = storage_filename("../../etc/passwd", "image/gif");
        assert!(name.ends_with(".gif"));
    }
}
