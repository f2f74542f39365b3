//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (outermost first)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │  Set Request ID  │ ← UUID if the client sent none
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response spans
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ Propagate Req ID │ ← Copies X-Request-Id onto the response
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```
//!
//! # Route Groups
//!
//! - `/is-norrland`, `/is-skane` - Pixel routes (referrer checked)
//! - `/health`, `/ready` - Monitoring (no referrer check)
//! - everything else - Fallback: referrer checked, then 204
//!
//! The router needs the peer address, so serve it with
//! `into_make_service_with_connect_info::<SocketAddr>()`.

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{propagate_request_id_layer, set_request_id_layer};
use crate::models::Region;
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Pixel endpoints
        .route(Region::Norrland.path(), get(handlers::is_norrland))
        .route(Region::Skane.path(), get(handlers::is_skane))
        // Health and status endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .fallback(handlers::unmatched)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
