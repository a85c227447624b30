//! Single-slot cache for the latest entry snapshot.
//!
//! The cache holds at most one [`EntryList`] together with the instant it was
//! stored. Callers pass `now` explicitly, which keeps freshness checks pure and
//! lets the repository decide which clock to use.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::entries::EntryList;

#[derive(Debug, Clone)]
struct CachedEntries {
    timestamp: Instant,
    data: EntryList,
}

/// Last fetched entries and when they were fetched.
#[derive(Debug, Clone, Default)]
pub struct EntryCache {
    state: Option<CachedEntries>,
}

/// Snapshot description reported by health checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub populated: bool,
    pub entries: usize,
    pub age_ms: Option<u64>,
}

impl EntryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the cache is populated and younger than `ttl` at `now`.
    pub fn is_valid(&self, now: Instant, ttl: Duration) -> bool {
        self.state
            .as_ref()
            .is_some_and(|cached| now.saturating_duration_since(cached.timestamp) < ttl)
    }

    /// Returns the stored entries, `None` if the cache was never populated.
    pub fn get(&self) -> Option<EntryList> {
        self.state.as_ref().map(|cached| Arc::clone(&cached.data))
    }

    /// Returns the stored entries only while they are still valid.
    pub fn fresh(&self, now: Instant, ttl: Duration) -> Option<EntryList> {
        if self.is_valid(now, ttl) {
            self.get()
        } else {
            None
        }
    }

    /// Replaces the stored entries and timestamp.
    pub fn set(&mut self, data: EntryList, now: Instant) {
        self.state = Some(CachedEntries {
            timestamp: now,
            data,
        });
    }

    /// Time elapsed since the entries were stored.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.state
            .as_ref()
            .map(|cached| now.saturating_duration_since(cached.timestamp))
    }

    pub fn status(&self, now: Instant) -> CacheStatus {
        CacheStatus {
            populated: self.state.is_some(),
            entries: self.state.as_ref().map_or(0, |cached| cached.data.len()),
            age_ms: self
                .age(now)
                .map(|age| u64::try_from(age.as_millis()).unwrap_or(u64::MAX)),
        }
    }
}
