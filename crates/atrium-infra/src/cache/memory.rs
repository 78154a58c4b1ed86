//! In-memory single-entry cache with a fixed TTL.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use atrium_core::ports::RecentCache;

/// One slot, one TTL, no key space.
///
/// Serves the live-comment polling endpoint: reads inside the TTL window
/// get the cached value, writes invalidate it eagerly. Data is lost on
/// process restart, which is fine - it only ever holds the last query
/// result.
pub struct TimedSlot {
    slot: RwLock<Option<(String, Instant)>>,
    ttl: Duration,
}

impl TimedSlot {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }
}

#[async_trait]
impl RecentCache for TimedSlot {
    async fn get(&self) -> Option<String> {
        let slot = self.slot.read().await;
        let (value, stored_at) = slot.as_ref()?;

        if stored_at.elapsed() > self.ttl {
            drop(slot);
            // Clean up the stale entry with the write lock.
            let mut slot = self.slot.write().await;
            *slot = None;
            return None;
        }

        Some(value.clone())
    }

    async fn put(&self, value: String) {
        let mut slot = self.slot.write().await;
        *slot = Some((value, Instant::now()));
    }

    async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_fresh_value_within_ttl() {
        let cache = TimedSlot::new(Duration::from_secs(5));
        cache.put("result".to_string()).await;
        assert_eq!(cache.get().await, Some("result".to_string()));
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let cache = TimedSlot::new(Duration::from_millis(10));
        cache.put("result".to_string()).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn invalidate_drops_the_value_eagerly() {
        let cache = TimedSlot::new(Duration::from_secs(60));
        cache.put("result".to_string()).await;
        cache.invalidate().await;
        assert_eq!(cache.get().await, None);
    }

    #[tokio::test]
    async fn put_replaces_the_previous_value() {
        let cache = TimedSlot::new(Duration::from_secs(60));
        cache.put("old".to_string()).await;
        cache.put("new".to_string()).await;
        assert_eq!(cache.get().await, Some("new".to_string()));
    }
}
