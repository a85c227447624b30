//! OAuth2 access token handling for the Sheets API.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, RedirectUrl, RefreshToken, TokenResponse, TokenUrl,
};
use tokio::sync::Mutex;

use greetsheet_core::storage::{Result, SourceError};

use super::error::map_token_error;
use crate::config::GoogleConfig;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub(super) const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token without a known expiry is used until the API rejects it.
    fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_none_or(|expires_at| now + TimeDelta::seconds(EXPIRY_MARGIN_SECS) < expires_at)
    }
}

struct TokenState {
    access: Option<AccessToken>,
    refresh_token: RefreshToken,
}

/// Hands out bearer tokens, refreshing them with the configured refresh token.
///
/// Refreshes are serialized behind a mutex so concurrent requests that find
/// an expired token trigger a single exchange. Each exchange is bounded by
/// `timeout`, so a stalled token endpoint cannot hold the lock.
pub struct TokenManager {
    client: BasicClient,
    state: Mutex<TokenState>,
    timeout: Duration,
}

impl TokenManager {
    /// Create a token manager from the Google OAuth configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - OAuth client and token material
    /// * `token_url` - Token endpoint, normally [`GOOGLE_TOKEN_URL`]
    /// * `timeout` - Upper bound for one refresh-token exchange
    ///
    /// # Errors
    ///
    /// Returns an error if one of the OAuth endpoint URLs cannot be parsed.
    pub fn new(config: &GoogleConfig, token_url: &str, timeout: Duration) -> Result<Self> {
        let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
            .map_err(|e| SourceError::Auth(e.to_string()))?;
        let token_url =
            TokenUrl::new(token_url.to_string()).map_err(|e| SourceError::Auth(e.to_string()))?;

        let mut client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            Some(ClientSecret::new(config.client_secret.clone())),
            auth_url,
            Some(token_url),
        );
        if let Some(redirect_uri) = &config.redirect_uri {
            client = client.set_redirect_uri(RedirectUrl::from_url(redirect_uri.clone()));
        }

        let access = config.access_token.clone().map(|secret| AccessToken {
            secret,
            expires_at: config.token_expiry,
        });

        Ok(Self {
            client,
            state: Mutex::new(TokenState {
                access,
                refresh_token: RefreshToken::new(config.refresh_token.clone()),
            }),
            timeout,
        })
    }

    /// Returns a usable access token, refreshing it first if needed.
    pub async fn access_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(token) = state.access.as_ref().filter(|t| t.is_usable(Utc::now())) {
            return Ok(token.secret.clone());
        }

        self.refresh(&mut state).await
    }

    /// Refreshes the access token unconditionally.
    ///
    /// Used after the API rejected a token that looked valid locally.
    pub async fn force_refresh(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        self.refresh(&mut state).await
    }

    async fn refresh(&self, state: &mut TokenState) -> Result<String> {
        tracing::debug!("Refreshing Google access token");

        let exchange = self
            .client
            .exchange_refresh_token(&state.refresh_token)
            .request_async(async_http_client);

        let response = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result.map_err(map_token_error),
            Err(_) => Err(SourceError::Auth(format!(
                "Token request timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
        .inspect_err(|err| tracing::error!(error = %err, "Google token refresh failed"))?;

        let expires_at = response
            .expires_in()
            .and_then(|expires_in| TimeDelta::from_std(expires_in).ok())
            .map(|expires_in| Utc::now() + expires_in);

        // Google may rotate the refresh token.
        if let Some(refresh_token) = response.refresh_token() {
            state.refresh_token = refresh_token.clone();
        }

        let secret = response.access_token().secret().clone();
        state.access = Some(AccessToken {
            secret: secret.clone(),
            expires_at,
        });

        tracing::info!(?expires_at, "Google access token refreshed");
        Ok(secret)
    }
}
