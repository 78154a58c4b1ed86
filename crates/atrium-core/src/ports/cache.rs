use async_trait::async_trait;

/// Single-entry result cache - no key space, just the last value.
///
/// Backs the live-comment polling endpoint: the latest serialized result
/// is served until a fixed TTL elapses or a write invalidates it.
#[async_trait]
pub trait RecentCache: Send + Sync {
    /// The cached value, if one is present and still fresh.
    async fn get(&self) -> Option<String>;

    /// Replace the cached value and restart its TTL.
    async fn put(&self, value: String);

    /// Drop the cached value. Called eagerly on every write.
    async fn invalidate(&self);
}
