//! In-memory row source for demo mode and testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use greetsheet_core::entries::Row;
use greetsheet_core::storage::{Result, RowSource};

/// Serves a fixed set of rows and counts how often it was asked for them.
#[derive(Debug, Default)]
pub struct InMemoryRowSource {
    rows: Vec<Row>,
    fetches: AtomicUsize,
}

impl InMemoryRowSource {
    /// Creates a source serving `rows`, header row first.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of times `fetch_rows` has been called.
    #[cfg(test)]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RowSource for InMemoryRowSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.clone())
    }
}
