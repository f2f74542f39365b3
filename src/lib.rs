//! # Geo Pixel
//!
//! Answers one question over HTTP: is the requesting client located inside a
//! fixed Swedish region group? A yes is a 1x1 transparent GIF, a no is an
//! empty 204, and a caller embedded on an untrusted page gets 403/400.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Request ID → Trace)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (/is-norrland, /is-skane, fallback, health)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Referrer validation → client IP → GeofenceService          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  GeoResolver (MaxMind database, loaded once, read-only)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! use geo_pixel::{AppState, Config, MaxMindGeoResolver, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let resolver = MaxMindGeoResolver::open(&config.geoip_db_path)?;
//!
//!     let app = build_router(AppState::new(Arc::new(resolver), config.clone()));
//!     let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
//!     axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use geo::{
    GeoLocation, GeoResolver, MaxMindGeoResolver, SharedGeoResolver, StaticGeoResolver,
    UnavailableGeoResolver,
};
pub use routes::build_router;
pub use services::GeofenceService;
pub use state::AppState;
