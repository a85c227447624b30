use async_trait::async_trait;

use crate::cache::CacheStatus;
use crate::entries::{EntryList, Row};

use super::Result;

/// Source of raw spreadsheet rows.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches every row of the configured range, header row first.
    async fn fetch_rows(&self) -> Result<Vec<Row>>;
}

/// Repository answering "what are the current entries".
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Gets the current entries, going to the source when the cache is stale
    /// or when `force_refetch` is set.
    async fn get_entries(&self, force_refetch: bool) -> Result<EntryList>;

    /// Describes the cached snapshot without touching the source.
    fn cache_status(&self) -> CacheStatus;
}
