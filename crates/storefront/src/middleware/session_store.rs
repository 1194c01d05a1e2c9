//! Bounded in-memory session store.
//!
//! Records live in a moka cache. Each entry expires at its record's
//! `expiry_date`, and the cache holds at most `max_sessions` entries, so
//! abandoned carts are evicted instead of accumulating.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tower_sessions::{
    SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store,
};

/// Time left until `record` expires, zero when already past.
fn time_to_expiry(record: &Record) -> Duration {
    (record.expiry_date - OffsetDateTime::now_utc())
        .try_into()
        .unwrap_or(Duration::ZERO)
}

/// Per-entry expiry driven by the record's own expiry date.
struct RecordExpiry;

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(time_to_expiry(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(time_to_expiry(record))
    }
}

/// Session store backed by a bounded moka cache.
#[derive(Debug, Clone)]
pub struct MokaSessionStore {
    cache: Cache<Id, Record>,
}

impl MokaSessionStore {
    /// Create a store holding at most `max_sessions` sessions.
    #[must_use]
    pub fn new(max_sessions: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_sessions)
                .expire_after(RecordExpiry)
                .build(),
        }
    }

    /// Number of sessions currently held, after pending evictions run.
    pub async fn session_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(id).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record(expires_in: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_expired_sessions_are_evicted() {
        let store = MokaSessionStore::new(100);
        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut expired = record(TimeDuration::minutes(-5));
            store.create(&mut expired).await.unwrap();
            ids.push(expired.id);
        }

        for id in &ids {
            assert!(store.load(id).await.unwrap().is_none());
        }
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_live_session_round_trips() {
        let store = MokaSessionStore::new(100);
        let mut live = record(TimeDuration::minutes(30));
        store.create(&mut live).await.unwrap();

        let loaded = store.load(&live.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, live.id);
        assert_eq!(loaded.expiry_date, live.expiry_date);
        assert_eq!(store.session_count().await, 1);

        store.delete(&live.id).await.unwrap();
        assert!(store.load(&live.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let store = MokaSessionStore::new(5);
        for _ in 0..50 {
            let mut live = record(TimeDuration::minutes(30));
            store.create(&mut live).await.unwrap();
        }
        assert!(store.session_count().await <= 5);
    }
}
