use std::sync::Arc;

use async_trait::async_trait;
use shared::types::{Staff, StaffFields};

use super::client::RedisCache;
use crate::domain::staff::StaffRepository;
use crate::error::StaffServiceError;

/// TTL in seconds of the cached full scan.
const TTL_ALL: u64 = 300;
/// TTL in seconds of single-record entries.
const TTL_BY_ID: u64 = 600;

/// Cache-aside decorator around a [`StaffRepository`].
///
/// Reads check Redis first; every successful write drops the full-scan entry
/// and the entry of the touched record. Invalidation is best effort: a read
/// that loaded from the store before a write can still repopulate a stale
/// entry, which then lives until its TTL expires.
pub struct CachedStaffRepository {
    inner: Arc<dyn StaffRepository>,
    cache: RedisCache,
}

impl CachedStaffRepository {
    pub fn new(inner: Arc<dyn StaffRepository>, cache: RedisCache) -> Self {
        Self { inner, cache }
    }

    fn key_all(&self) -> String {
        self.cache.key("staff:all")
    }

    fn key_by_id(&self, id: i64) -> String {
        self.cache.key(&format!("staff:id:{id}"))
    }

    async fn invalidate(&self, id: i64) {
        self.cache
            .delete(&[self.key_all(), self.key_by_id(id)])
            .await;
    }
}

#[async_trait]
impl StaffRepository for CachedStaffRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Staff>, StaffServiceError> {
        let key = self.key_by_id(id);
        if let Some(cached) = self.cache.get::<Staff>(&key).await {
            return Ok(Some(cached));
        }

        let output = self.inner.find_by_id(id).await?;
        if let Some(staff) = &output {
            self.cache.set(&key, staff, TTL_BY_ID).await;
        }

        Ok(output)
    }

    async fn find_all(&self) -> Result<Vec<Staff>, StaffServiceError> {
        let key = self.key_all();
        if let Some(cached) = self.cache.get::<Vec<Staff>>(&key).await {
            return Ok(cached);
        }

        let output = self.inner.find_all().await?;
        self.cache.set(&key, &output, TTL_ALL).await;

        Ok(output)
    }

    async fn create(&self, staff: StaffFields) -> Result<Staff, StaffServiceError> {
        let output = self.inner.create(staff).await?;
        self.invalidate(output.id).await;

        Ok(output)
    }

    async fn update(&self, id: i64, staff: StaffFields) -> Result<Staff, StaffServiceError> {
        let output = self.inner.update(id, staff).await?;
        self.invalidate(id).await;

        Ok(output)
    }

    async fn delete(&self, id: i64) -> Result<(), StaffServiceError> {
        self.inner.delete(id).await?;
        self.invalidate(id).await;

        Ok(())
    }
}
