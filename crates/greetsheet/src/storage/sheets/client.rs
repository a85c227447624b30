//! Sheets v4 `values.get` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use greetsheet_core::entries::Row;
use greetsheet_core::storage::{Result, RowSource, SourceError};

use super::error::map_request_error;
use super::token::{TokenManager, GOOGLE_TOKEN_URL};
use crate::config::GoogleConfig;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Google endpoints a [`SheetsRowSource`] talks to.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    /// Base of the spreadsheets collection, without a trailing slash.
    pub sheets_api: String,
    /// OAuth2 token endpoint used for refresh-token exchanges.
    pub token_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            sheets_api: SHEETS_API_BASE.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }
}

/// Response body of `spreadsheets.values.get`.
///
/// `values` is omitted entirely when the range is empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Row>,
}

/// Row source reading one range of one spreadsheet.
pub struct SheetsRowSource {
    http: reqwest::Client,
    tokens: TokenManager,
    values_url: Url,
}

impl SheetsRowSource {
    /// Create a source for `range` of `spreadsheet_id`.
    ///
    /// # Arguments
    ///
    /// * `google` - OAuth client and token material
    /// * `spreadsheet_id` - ID from the spreadsheet URL
    /// * `range` - A1 notation range, e.g. `A:Z` or `Sheet1!A1:F`
    /// * `timeout` - Timeout applied to each Sheets API and token request
    pub fn new(
        google: &GoogleConfig,
        spreadsheet_id: &str,
        range: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Self::with_endpoints(
            google,
            &GoogleEndpoints::default(),
            spreadsheet_id,
            range,
            timeout,
        )
    }

    /// Like [`SheetsRowSource::new`], against explicit endpoints.
    pub fn with_endpoints(
        google: &GoogleConfig,
        endpoints: &GoogleEndpoints,
        spreadsheet_id: &str,
        range: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            tokens: TokenManager::new(google, &endpoints.token_url, timeout)?,
            values_url: values_url(&endpoints.sheets_api, spreadsheet_id, range)?,
        })
    }

    async fn request_values(&self, access_token: &str) -> Result<reqwest::Response> {
        self.http
            .get(self.values_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_request_error)
    }
}

#[async_trait]
impl RowSource for SheetsRowSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>> {
        let access_token = self.tokens.access_token().await?;
        let mut response = self.request_values(&access_token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Sheets API rejected the access token, refreshing");
            let access_token = self.tokens.force_refresh().await?;
            response = self.request_values(&access_token).await?;
        }

        let status = response.status();
        let body = response.bytes().await.map_err(map_request_error)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::error!(status = status.as_u16(), %body, "Sheets API request failed");
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows = parse_value_range(&body)?;
        tracing::debug!(rows = rows.len(), "Fetched sheet rows");
        Ok(rows)
    }
}

/// Builds `{base}/{spreadsheet_id}/values/{range}` with each part encoded as
/// a single path segment.
fn values_url(base: &str, spreadsheet_id: &str, range: &str) -> Result<Url> {
    let mut url =
        Url::parse(base).map_err(|e| SourceError::Request(format!("Invalid API URL: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| SourceError::Request(format!("Invalid API URL: {base}")))?
        .extend([spreadsheet_id, "values", range]);

    Ok(url)
}

fn parse_value_range(body: &[u8]) -> Result<Vec<Row>> {
    serde_json::from_slice::<ValueRange>(body)
        .map(|value_range| value_range.values)
        .map_err(|e| SourceError::Decode(e.to_string()))
}
