//! Cached entry repository.
//!
//! Wraps a `RowSource` with a single-slot, fixed-TTL cache of the transformed
//! entries:
//!
//! - **Fresh cache**: return the cached list without touching the source
//! - **Stale, empty or forced**: fetch rows, transform, replace the cache
//! - **Fetch failure**: propagate the error and leave the cache as it was
//!
//! Concurrent misses are not coalesced. Each one fetches on its own and the
//! last to finish owns the cache.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;

use greetsheet_core::cache::{CacheStatus, EntryCache};
use greetsheet_core::entries::{rows_to_entries, EntryList};
use greetsheet_core::storage::{EntryRepository, Result, RowSource};

/// Entry repository backed by a row source and an in-memory snapshot.
///
/// # Type Parameters
///
/// * `S` - The row source entries are built from
pub struct CachedEntryRepository<S>
where
    S: RowSource,
{
    source: Arc<S>,
    cache: RwLock<EntryCache>,
    ttl: Duration,
}

impl<S> CachedEntryRepository<S>
where
    S: RowSource,
{
    /// Creates a repository with an empty cache.
    ///
    /// # Arguments
    ///
    /// * `source` - Where rows are fetched from on a miss
    /// * `ttl` - How long a fetched snapshot is served before refetching
    pub fn new(source: Arc<S>, ttl: Duration) -> Self {
        Self {
            source,
            cache: RwLock::new(EntryCache::new()),
            ttl,
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, EntryCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, EntryCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Read through tokio's clock so paused-time tests can move it.
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

#[async_trait]
impl<S> EntryRepository for CachedEntryRepository<S>
where
    S: RowSource + 'static,
{
    async fn get_entries(&self, force_refetch: bool) -> Result<EntryList> {
        if !force_refetch {
            let cached = self.read_cache().fresh(now(), self.ttl);
            if let Some(entries) = cached {
                tracing::trace!(count = entries.len(), "Cache hit for sheet entries");
                return Ok(entries);
            }
        }

        tracing::debug!(force_refetch, "Fetching sheet rows");
        let rows = self.source.fetch_rows().await.inspect_err(|err| {
            tracing::error!(error = %err, "Failed to fetch sheet rows");
        })?;

        let entries: EntryList = Arc::new(rows_to_entries(&rows)?);
        self.write_cache().set(Arc::clone(&entries), now());

        tracing::debug!(count = entries.len(), "Sheet entries cached");
        Ok(entries)
    }

    fn cache_status(&self) -> CacheStatus {
        self.read_cache().status(now())
    }
}
