//! Three-tier record cache: memory, disk snapshot, live fetch.
//!
//! A query path reads the newest snapshot with no I/O while it is fresh,
//! rehydrates the persisted snapshot when only the process restarted, and
//! refetches from the upstream once the staleness window expires. A failed
//! refresh falls back to the most recent snapshot of any age. An empty
//! result only ever means no fetch has succeeded since the store was created.

use std::sync::Arc;

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{CacheConfig, ListingRecord};
use crate::pipeline::RecordBuilder;
use crate::services::ListingSource;
use crate::storage::SnapshotStore;

/// An immutable record set produced by one successful fetch+build cycle.
///
/// Records are ordered salary-descending at build time. Snapshots are
/// replaced whole on refresh, never mutated, so concurrent readers always
/// hold a consistent set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheSnapshot {
    /// Unix timestamp of the fetch that produced this snapshot
    pub fetched_at: i64,

    /// Listing records, salary descending
    pub records: Vec<ListingRecord>,
}

impl CacheSnapshot {
    /// Snapshot age in seconds relative to `now`.
    pub fn age_secs(&self, now: i64) -> i64 {
        now - self.fetched_at
    }
}

/// Owns the cache state and the refresh policy.
pub struct CacheManager {
    source: Box<dyn ListingSource>,
    builder: RecordBuilder,
    store: SnapshotStore,
    snapshot_key: String,
    timeout_secs: i64,
    memory: RwLock<Option<Arc<CacheSnapshot>>>,
}

impl CacheManager {
    pub fn new(
        source: Box<dyn ListingSource>,
        builder: RecordBuilder,
        store: SnapshotStore,
        config: &CacheConfig,
    ) -> Self {
        Self {
            source,
            builder,
            store,
            snapshot_key: config.snapshot_file.clone(),
            timeout_secs: config.timeout_secs as i64,
            memory: RwLock::new(None),
        }
    }

    /// Get the current record snapshot, refreshing if stale.
    ///
    /// Never fails: a refresh failure falls back to the most recent snapshot
    /// available (memory, then disk), and only when no snapshot has ever
    /// existed does this return an empty one. Concurrent callers may race
    /// into a redundant refresh; that wastes a fetch, not correctness, since
    /// refresh is idempotent and the snapshot swap is atomic.
    pub async fn get_records(&self, force_refresh: bool) -> Arc<CacheSnapshot> {
        let now = Utc::now().timestamp();

        if !force_refresh {
            if let Some(snapshot) = self.fresh_in_memory(now).await {
                log::debug!(
                    "Serving in-memory snapshot (age {}s)",
                    snapshot.age_secs(now)
                );
                return snapshot;
            }

            if let Some(snapshot) = self.fresh_on_disk(now).await {
                log::info!(
                    "Rehydrated disk snapshot (age {}s)",
                    snapshot.age_secs(now)
                );
                return snapshot;
            }
        }

        match self.refresh(now).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Refresh failed ({e}); falling back to stale snapshot");
                self.any_age_fallback().await
            }
        }
    }

    async fn fresh_in_memory(&self, now: i64) -> Option<Arc<CacheSnapshot>> {
        let snapshot = self.memory.read().await.clone()?;
        (snapshot.age_secs(now) < self.timeout_secs).then_some(snapshot)
    }

    async fn fresh_on_disk(&self, now: i64) -> Option<Arc<CacheSnapshot>> {
        let snapshot: CacheSnapshot = self
            .store
            .read_json(&self.snapshot_key)
            .await
            .ok()
            .flatten()?;

        if snapshot.age_secs(now) >= self.timeout_secs || snapshot.records.is_empty() {
            return None;
        }

        let snapshot = Arc::new(snapshot);
        *self.memory.write().await = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    /// Live fetch + build + persist + atomic swap.
    async fn refresh(&self, now: i64) -> Result<Arc<CacheSnapshot>> {
        log::info!("Refreshing listings from upstream");
        let blocks = self.source.fetch_blocks().await?;
        if blocks.is_empty() {
            return Err(AppError::fetch("refresh", "upstream returned no blocks"));
        }

        let reference = Local::now().date_naive();
        let records = self.builder.build_all(&blocks, reference);
        log::info!("Built {} records from {} blocks", records.len(), blocks.len());

        let snapshot = CacheSnapshot {
            fetched_at: now,
            records,
        };

        // Persisting is best-effort: a read-only disk must not fail the query
        if let Err(e) = self.store.write_json(&self.snapshot_key, &snapshot).await {
            log::warn!("Failed to persist snapshot: {e}");
        }

        let snapshot = Arc::new(snapshot);
        *self.memory.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Most recent snapshot regardless of age, or an empty one if none ever
    /// existed.
    async fn any_age_fallback(&self) -> Arc<CacheSnapshot> {
        if let Some(snapshot) = self.memory.read().await.clone() {
            return snapshot;
        }

        if let Ok(Some(snapshot)) = self.store.read_json::<CacheSnapshot>(&self.snapshot_key).await
        {
            let snapshot = Arc::new(snapshot);
            *self.memory.write().await = Some(Arc::clone(&snapshot));
            return snapshot;
        }

        Arc::new(CacheSnapshot::default())
    }
}
