//! Local stand-in for Google's token endpoint and the Sheets `values.get` API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use tokio::net::TcpListener;

use super::client::GoogleEndpoints;

/// Access token handed out by the token endpoint.
pub const ISSUED_TOKEN: &str = "ya29.fresh";

#[derive(Debug, Clone)]
pub struct Behavior {
    /// Bearer token the Sheets endpoint accepts; anything else gets a 401.
    pub accepted_token: &'static str,
    /// Status returned for an accepted token.
    pub sheet_status: StatusCode,
    /// Delay before the token endpoint answers.
    pub token_delay: Option<Duration>,
    /// Answer token requests with `invalid_grant`.
    pub reject_refresh: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            accepted_token: ISSUED_TOKEN,
            sheet_status: StatusCode::OK,
            token_delay: None,
            reject_refresh: false,
        }
    }
}

struct MockState {
    behavior: Behavior,
    sheet_calls: AtomicUsize,
    token_calls: AtomicUsize,
    refresh_tokens: Mutex<Vec<String>>,
}

pub struct MockGoogle {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockGoogle {
    pub async fn start(behavior: Behavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            sheet_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
            refresh_tokens: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/token", post(token))
            .route("/spreadsheets/{id}/values/{range}", get(values))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn endpoints(&self) -> GoogleEndpoints {
        GoogleEndpoints {
            sheets_api: format!("http://{}/spreadsheets", self.addr),
            token_url: format!("http://{}/token", self.addr),
        }
    }

    pub fn sheet_calls(&self) -> usize {
        self.state.sheet_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens presented to the token endpoint, in order.
    pub fn refresh_tokens(&self) -> Vec<String> {
        self.state.refresh_tokens.lock().unwrap().clone()
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let call = state.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if let Some(refresh_token) = form.get("refresh_token") {
        state
            .refresh_tokens
            .lock()
            .unwrap()
            .push(refresh_token.clone());
    }

    if let Some(delay) = state.behavior.token_delay {
        tokio::time::sleep(delay).await;
    }

    if state.behavior.reject_refresh {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "access_token": ISSUED_TOKEN,
        "token_type": "Bearer",
        "expires_in": 3599,
        "refresh_token": format!("1//rotated-{call}"),
    }))
    .into_response()
}

async fn values(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.sheet_calls.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {}", state.behavior.accepted_token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str());

    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Request had invalid credentials").into_response();
    }

    if !state.behavior.sheet_status.is_success() {
        return (state.behavior.sheet_status, "backend unavailable").into_response();
    }

    Json(serde_json::json!({
        "range": "Sheet1!A1:Z3",
        "majorDimension": "ROWS",
        "values": [
            ["Timestamp", "code", "begruessung"],
            ["", "abc", "Hallo"],
            ["2021-01-01", "def"]
        ]
    }))
    .into_response()
}
