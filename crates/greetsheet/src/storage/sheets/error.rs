//! Sheets API error mapping.
//!
//! Maps HTTP client and OAuth2 errors to `SourceError` from
//! `greetsheet_core::storage`.

use oauth2::basic::BasicErrorResponse;
use oauth2::RequestTokenError;

use greetsheet_core::storage::SourceError;

/// Map a transport error from the Sheets API request to SourceError.
pub fn map_request_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Request("Sheets API request timed out".to_string())
    } else if err.is_connect() {
        SourceError::Request(format!("Could not connect to Sheets API: {err}"))
    } else {
        SourceError::Request(err.to_string())
    }
}

/// Map a failed refresh-token exchange to SourceError.
///
/// Error responses from the token endpoint keep their OAuth2 error code
/// (e.g. `invalid_grant` for a revoked refresh token).
pub fn map_token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> SourceError
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => SourceError::Auth(response.to_string()),
        RequestTokenError::Request(err) => {
            SourceError::Auth(format!("Token request failed: {err}"))
        }
        RequestTokenError::Parse(err, _) => {
            SourceError::Auth(format!("Invalid token response: {err}"))
        }
        RequestTokenError::Other(message) => SourceError::Auth(message),
    }
}
