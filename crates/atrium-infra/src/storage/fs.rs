//! Filesystem blob storage.

use std::path::PathBuf;

use async_trait::async_trait;

use atrium_core::error::StorageError;
use atrium_core::ports::BlobStorage;

/// Stores uploads as files under a root directory and hands out URLs
/// below a public prefix (the api-server serves the directory statically
/// under that prefix).
pub struct FsStorage {
    root: PathBuf,
    public_prefix: String,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }
}

#[async_trait]
impl BlobStorage for FsStorage {
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        let path = self.root.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        tracing::debug!(file = %path.display(), size = bytes.len(), "Stored upload");

        Ok(format!(
            "{}/{}",
            self.public_prefix.trim_end_matches('/'),
            filename
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_bytes_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().join("uploads"), "/uploads");

        let url = storage.put("a.png", b"fake-png").await.unwrap();
        assert_eq!(url, "/uploads/a.png");

        let stored = tokio::fs::read(dir.path().join("uploads/a.png")).await.unwrap();
        assert_eq!(stored, b"fake-png");
    }

    #[tokio::test]
    async fn creates_the_upload_directory_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        let storage = FsStorage::new(&nested, "/uploads/");

        let url = storage.put("clip.mp4", b"x").await.unwrap();
        assert_eq!(url, "/uploads/clip.mp4");
        assert!(nested.join("clip.mp4").exists());
    }
}
