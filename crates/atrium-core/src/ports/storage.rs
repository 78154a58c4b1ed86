use async_trait::async_trait;

use crate::error::StorageError;

/// Blob storage - where uploaded bytes live.
///
/// The returned locator is the public URL recorded on the media row; it
/// never changes after the write.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Store `bytes` under the generated `filename` and return the public
    /// URL for it.
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;
}
