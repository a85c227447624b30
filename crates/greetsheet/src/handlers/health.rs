//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/livez` - Basic liveness probe (immediate 200, no checks)
//! - `/healthz` - Entry cache status (passive, never fetches the sheet)

use axum::{extract::State, http::StatusCode, Json};

use greetsheet_core::cache::CacheStatus;

use crate::state::AppState;

/// GET /livez - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting connections.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Entry cache status.
///
/// Reports whether a snapshot is cached, how many entries it holds and how
/// old it is. An empty cache is still healthy; the next query fills it.
#[axum::debug_handler]
pub async fn healthz(State(state): State<AppState>) -> Json<CacheStatus> {
    Json(state.entry_repo.cache_status())
}
