//! Shared application state for Axum handlers.
//!
//! Holds the configuration and the geofence service. Both are immutable
//! after startup; the geo resolver inside the service is the only shared
//! resource and it is read-only, so no request ever waits on another.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::geo::SharedGeoResolver;
use crate::services::GeofenceService;

/// Shared application state for Axum handlers.
///
/// This struct is cloned for each request handler. All internal data
/// is wrapped in `Arc` for efficient sharing.
#[derive(Clone)]
pub struct AppState {
    /// Region classification on top of the geo resolver
    pub geofence: GeofenceService,
    /// Timestamp when the application started
    pub started_at: Instant,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state from a resolver built at startup.
    ///
    /// The resolver is injected rather than opened here so that a failed
    /// database load is decided once, by the caller, before serving.
    pub fn new(resolver: SharedGeoResolver, config: Config) -> Self {
        Self {
            geofence: GeofenceService::new(resolver),
            started_at: Instant::now(),
            config: Arc::new(config),
        }
    }

    /// Trusted referrer host suffix.
    pub fn trusted_referrer_suffix(&self) -> &str {
        &self.config.trusted_referrer_suffix
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
