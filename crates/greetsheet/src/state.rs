//! Application state shared by all request handlers.
//!
//! The entry repository is held as a trait object so the server can run
//! against Google Sheets or the demo sheet without changing any handler.

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;

use greetsheet_core::storage::EntryRepository;

use crate::config::Config;
use crate::graphql::{create_schema, Context, Schema};
use crate::mock_data::demo_rows;
use crate::storage::{CachedEntryRepository, InMemoryRowSource, SheetsRowSource};

/// Shared application state.
///
/// Cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Entry repository (cached, wraps the row source).
    pub entry_repo: Arc<dyn EntryRepository>,
    pub schema: Arc<Schema>,
    /// Value returned by the `test` query.
    pub test_value: Option<String>,
    /// Upper bound for handling a single HTTP request.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        entry_repo: Arc<dyn EntryRepository>,
        test_value: Option<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            entry_repo,
            schema: Arc::new(create_schema()),
            test_value,
            request_timeout,
        }
    }

    /// Creates state backed by the configured Google spreadsheet.
    ///
    /// # Errors
    ///
    /// Fails if no Google credentials are configured or the Sheets client
    /// cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let google = config
            .google
            .as_ref()
            .context("Google credentials are not configured (set GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN, or run with --demo)")?;

        let source = SheetsRowSource::new(
            google,
            &config.spreadsheet_id,
            &config.sheet_range,
            config.request_timeout(),
        )?;

        tracing::info!(
            spreadsheet_id = %config.spreadsheet_id,
            range = %config.sheet_range,
            ttl_ms = config.cache_ttl_ms,
            "Using Google Sheets entry source"
        );

        let repo = CachedEntryRepository::new(Arc::new(source), config.cache_ttl());
        Ok(Self::new(
            Arc::new(repo),
            config.test_value.clone(),
            config.request_timeout(),
        ))
    }

    /// Creates state backed by the built-in demo sheet.
    pub fn with_demo_data(config: &Config) -> Self {
        tracing::info!("Using demo entry source");

        let source = InMemoryRowSource::new(demo_rows());
        let repo = CachedEntryRepository::new(Arc::new(source), config.cache_ttl());
        Self::new(
            Arc::new(repo),
            config.test_value.clone(),
            config.request_timeout(),
        )
    }

    /// Builds the GraphQL context for one request.
    pub fn graphql_context(&self) -> Context {
        Context {
            entry_repo: Arc::clone(&self.entry_repo),
            test_value: self.test_value.clone(),
        }
    }
}
