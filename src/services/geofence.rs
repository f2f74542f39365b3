use std::time::Instant;

use tracing::{debug, instrument};

use crate::geo::{GeoLocation, SharedGeoResolver};
use crate::metrics;
use crate::models::{Region, classify};

/// Answers "is this client inside region X" on top of a shared geo resolver.
///
/// Cloning is cheap: the resolver handle is reference counted and read-only,
/// so every request task can hold its own copy without locking.
#[derive(Clone)]
pub struct GeofenceService {
    resolver: SharedGeoResolver,
}

impl GeofenceService {
    /// Create a new geofence service.
    pub fn new(resolver: SharedGeoResolver) -> Self {
        Self { resolver }
    }

    /// Whether the underlying geo database is loaded.
    pub fn is_available(&self) -> bool {
        self.resolver.is_available()
    }

    /// Resolve a client address, recording lookup metrics.
    pub fn locate(&self, ip: &str) -> Option<GeoLocation> {
        let started = Instant::now();
        let location = self.resolver.lookup(ip);
        metrics::record_lookup(location.is_some(), started.elapsed().as_secs_f64());
        location
    }

    /// Resolve the client address and test it against one region group.
    ///
    /// Unknown addresses and an unavailable database both answer `false`.
    #[instrument(skip(self, region), fields(region = %region))]
    pub fn is_in_region(&self, ip: &str, region: Region) -> bool {
        let location = self.locate(ip);
        let inside = classify(location.as_ref(), region.region_set());

        match &location {
            Some(geo) => debug!(
                client_ip = %ip,
                country = geo.country_code.as_deref().unwrap_or("-"),
                region_code = geo.region_code.as_deref().unwrap_or("-"),
                inside,
                "Classified client location"
            ),
            None => debug!(client_ip = %ip, "No location for client"),
        }

        inside
    }
}
