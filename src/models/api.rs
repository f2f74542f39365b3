use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the geo database is not loaded
    pub status: String,
    /// Whether geo lookups can succeed
    pub geo_database_available: bool,
    /// Service version
    pub version: String,
    /// Seconds since startup
    pub uptime_seconds: u64,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(geo_database_available: bool, uptime_seconds: u64) -> Self {
        Self {
            status: if geo_database_available {
                "healthy"
            } else {
                "degraded"
            }
            .to_string(),
            geo_database_available,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_reflects_database() {
        assert_eq!(HealthResponse::new(true, 0).status, "healthy");
        assert_eq!(HealthResponse::new(false, 0).status, "degraded");
    }

    #[test]
    fn test_health_version_matches_package() {
        assert_eq!(HealthResponse::new(true, 5).version, env!("CARGO_PKG_VERSION"));
    }
}
