//! Geofencing pixel handlers.
//!
//! # Endpoints
//!
//! - `GET /is-norrland` - pixel when the client resolves to Norrland
//! - `GET /is-skane` - pixel when the client resolves to Skåne
//! - any other path (fallback) - referrer check, then always 204
//!
//! # Request Flow
//!
//! ```text
//! Referer check ──rejected──▶ 403 (missing/untrusted) | 400 (malformed)
//!      │
//!   accepted
//!      ▼
//! client IP (X-Forwarded-For, else peer) ─▶ geo lookup ─▶ region test
//!      │
//!      ├── inside  ─▶ 200 image/gif, 43-byte pixel
//!      └── outside ─▶ 204 (also unknown IP, unavailable database, unmatched route)
//! ```

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::{AppError, AppResult};
use crate::metrics::{self, Outcome};
use crate::middleware::{forwarded_for, request_id, resolve_client_ip};
use crate::models::{PIXEL_CONTENT_TYPE, PIXEL_GIF, Region};
use crate::state::AppState;
use crate::validation::require_trusted_referrer;

/// `GET /is-norrland`
#[instrument(skip_all, fields(request_id = request_id(&headers)))]
pub async fn is_norrland(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    respond(Region::Norrland.path(), || {
        classify_request(&state, &headers, &peer, Some(Region::Norrland))
    })
}

/// `GET /is-skane`
#[instrument(skip_all, fields(request_id = request_id(&headers)))]
pub async fn is_skane(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    respond(Region::Skane.path(), || {
        classify_request(&state, &headers, &peer, Some(Region::Skane))
    })
}

/// Fallback for every other path.
///
/// The referrer is still checked first, so an untrusted caller gets 403
/// even on unknown paths; a trusted one always gets 204.
#[instrument(skip_all, fields(path = %uri.path(), request_id = request_id(&headers)))]
pub async fn unmatched(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    respond("unmatched", || classify_request(&state, &headers, &peer, None))
}

/// Run the pipeline for one request and decide whether a pixel is owed.
///
/// `region` is `None` when the path is not a pixel route; the referrer is
/// validated first in every case.
pub fn classify_request(
    state: &AppState,
    headers: &HeaderMap,
    peer: &SocketAddr,
    region: Option<Region>,
) -> AppResult<bool> {
    let referrer = headers
        .get(header::REFERER)
        .map(|value| value.to_str().unwrap_or_default());
    require_trusted_referrer(referrer, state.trusted_referrer_suffix())?;

    let Some(region) = region else {
        return Ok(false);
    };

    let client_ip = resolve_client_ip(forwarded_for(headers), peer);
    Ok(state.geofence.is_in_region(&client_ip, region))
}

/// Render a classification result and record its outcome.
fn respond(route: &str, run: impl FnOnce() -> AppResult<bool>) -> Response {
    let (outcome, response) = match run() {
        Ok(true) => (Outcome::Pixel, pixel_response()),
        Ok(false) => (Outcome::NoContent, StatusCode::NO_CONTENT.into_response()),
        Err(err) => {
            let outcome = match err {
                AppError::ReferrerMalformed(_) => Outcome::BadRequest,
                _ => Outcome::Forbidden,
            };
            (outcome, err.into_response())
        }
    };

    metrics::record_request(route, outcome);
    response
}

/// 200 with the transparent GIF.
pub fn pixel_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PIXEL_CONTENT_TYPE)],
        PIXEL_GIF,
    )
        .into_response()
}
