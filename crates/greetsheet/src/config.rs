use std::{env, fmt, time::Duration};

use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

/// Spreadsheet served when `SPREADSHEET_ID` is not set.
pub const DEFAULT_SPREADSHEET_ID: &str = "1LW3jwZED2ivelmt-VqrweqbEH3mN-okbLGQjO5X_qmE";

/// Range fetched when `SHEET_RANGE` is not set.
pub const DEFAULT_SHEET_RANGE: &str = "A:Z";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// OAuth client and token material for the Google Sheets API.
#[derive(Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<Url>,
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub token_expiry: Option<DateTime<Utc>>,
}

// Secrets stay out of logs.
impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google credentials, `None` when `GOOGLE_CLIENT_ID` is unset.
    pub google: Option<GoogleConfig>,
    /// Value answered by the `test` query.
    pub test_value: Option<String>,
    pub spreadsheet_id: String,
    pub sheet_range: String,
    /// Entry cache TTL in milliseconds (default: 100,000)
    pub cache_ttl_ms: u64,
    /// Per-request timeout in seconds (default: 30)
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `GOOGLE_CLIENT_ID` - OAuth client ID (optional, enables the Sheets source)
    /// - `GOOGLE_CLIENT_SECRET` - OAuth client secret (required with a client ID)
    /// - `GOOGLE_REDIRECT_URI` - OAuth redirect URI (optional)
    /// - `GOOGLE_ACCESS_TOKEN` - Initial access token (optional)
    /// - `GOOGLE_REFRESH_TOKEN` - Refresh token (required with a client ID)
    /// - `GOOGLE_TOKEN_EXPIRY_DATE` - Access token expiry in epoch milliseconds (optional)
    /// - `TEST` - Value returned by the `test` query (optional)
    /// - `SPREADSHEET_ID` - Spreadsheet to read (default: the invitation sheet)
    /// - `SHEET_RANGE` - A1 range to read (default: "A:Z")
    /// - `CACHE_TTL_MS` - Entry cache TTL in milliseconds (default: 100,000)
    /// - `REQUEST_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    ///
    /// # Errors
    ///
    /// Returns an error if Google is partially configured or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let google = match var("GOOGLE_CLIENT_ID") {
            Some(client_id) => Some(GoogleConfig {
                client_id,
                client_secret: var("GOOGLE_CLIENT_SECRET")
                    .ok_or(ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
                redirect_uri: var("GOOGLE_REDIRECT_URI")
                    .map(|uri| {
                        uri.parse::<Url>().map_err(|e| ConfigError::Invalid {
                            name: "GOOGLE_REDIRECT_URI",
                            reason: e.to_string(),
                        })
                    })
                    .transpose()?,
                access_token: var("GOOGLE_ACCESS_TOKEN"),
                refresh_token: var("GOOGLE_REFRESH_TOKEN")
                    .ok_or(ConfigError::Missing("GOOGLE_REFRESH_TOKEN"))?,
                token_expiry: var("GOOGLE_TOKEN_EXPIRY_DATE")
                    .map(|value| parse_expiry(&value))
                    .transpose()?,
            }),
            None => None,
        };

        Ok(Self {
            google,
            test_value: lookup("TEST"),
            spreadsheet_id: var("SPREADSHEET_ID")
                .unwrap_or_else(|| DEFAULT_SPREADSHEET_ID.to_string()),
            sheet_range: var("SHEET_RANGE").unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
            cache_ttl_ms: var("CACHE_TTL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(100_000),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Get request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_expiry(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "GOOGLE_TOKEN_EXPIRY_DATE",
        reason,
    };

    let millis: i64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;

    DateTime::from_timestamp_millis(millis).ok_or_else(|| invalid("out of range".to_string()))
}
