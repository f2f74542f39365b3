//! Geo resolution port and its in-process implementations.
//!
//! [`GeoResolver`] maps an IP address to a best-effort country and region.
//! "Unknown" is a normal answer, never an error: unparsable input, addresses
//! missing from the database and an unavailable database all resolve to
//! `None`.
//!
//! # Implementations
//!
//! - [`MaxMindGeoResolver`]: memory-resident MaxMind database, production
//! - [`UnavailableGeoResolver`]: stands in when the database failed to load
//! - [`StaticGeoResolver`]: fixed in-memory table for tests and local runs
//!
//! The resolver is built once at startup and shared as [`SharedGeoResolver`];
//! every implementation is read-only after construction so concurrent lookups
//! need no locking.

mod maxmind;

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

pub use maxmind::{MaxMindGeoResolver, region_code_for_subdivision};

/// Geographic location for an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeoLocation {
    /// ISO 3166-1 alpha-2 country code (e.g. "SE")
    pub country_code: Option<String>,
    /// Provider region code, meaningful only together with the country
    pub region_code: Option<String>,
}

impl GeoLocation {
    pub fn new(country_code: impl Into<String>, region_code: impl Into<String>) -> Self {
        Self {
            country_code: Some(country_code.into()),
            region_code: Some(region_code.into()),
        }
    }

    /// A location known only down to the country.
    pub fn country_only(country_code: impl Into<String>) -> Self {
        Self {
            country_code: Some(country_code.into()),
            region_code: None,
        }
    }
}

/// Resolver for IP address to geographic location.
///
/// Implementations must be safe to call from many request tasks at once.
pub trait GeoResolver: Send + Sync {
    /// Resolve a parsed address. `None` when the address is unknown.
    fn lookup_addr(&self, ip: IpAddr) -> Option<GeoLocation>;

    /// Resolve a raw address string. Malformed input resolves to `None`.
    fn lookup(&self, ip: &str) -> Option<GeoLocation> {
        let addr: IpAddr = ip.parse().ok()?;
        self.lookup_addr(addr)
    }

    /// Whether lookups can ever succeed.
    fn is_available(&self) -> bool {
        true
    }
}

/// Resolver handle shared by all request handlers.
pub type SharedGeoResolver = Arc<dyn GeoResolver>;

/// Resolver used when the geo database could not be loaded.
///
/// Every lookup is unknown, so every classification degrades to "not in
/// region" instead of failing the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeoResolver;

impl GeoResolver for UnavailableGeoResolver {
    fn lookup_addr(&self, _ip: IpAddr) -> Option<GeoLocation> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// In-memory resolver backed by a fixed address table.
#[derive(Debug, Clone, Default)]
pub struct StaticGeoResolver {
    entries: HashMap<IpAddr, GeoLocation>,
}

impl StaticGeoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an address mapping, builder style.
    pub fn with_entry(mut self, ip: IpAddr, location: GeoLocation) -> Self {
        self.entries.insert(ip, location);
        self
    }
}

impl FromIterator<(IpAddr, GeoLocation)> for StaticGeoResolver {
    fn from_iter<I: IntoIterator<Item = (IpAddr, GeoLocation)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl GeoResolver for StaticGeoResolver {
    fn lookup_addr(&self, ip: IpAddr) -> Option<GeoLocation> {
        self.entries.get(&ip).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn sample() -> StaticGeoResolver {
        StaticGeoResolver::new()
            .with_entry(
                IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)),
                GeoLocation::new("SE", "24"),
            )
            .with_entry(
                IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
                GeoLocation::country_only("US"),
            )
    }

    #[test]
    fn test_static_lookup_known_ip() {
        let geo = sample().lookup("1.2.3.4").unwrap();

        assert_eq!(geo.country_code.as_deref(), Some("SE"));
        assert_eq!(geo.region_code.as_deref(), Some("24"));
    }

    #[test]
    fn test_static_lookup_unknown_ip() {
        assert!(sample().lookup("9.9.9.9").is_none());
    }

    #[test]
    fn test_malformed_ip_resolves_to_none() {
        let resolver = sample();

        assert!(resolver.lookup("not-an-ip").is_none());
        assert!(resolver.lookup("1.2.3.4, 10.0.0.1").is_none());
        assert!(resolver.lookup("").is_none());
    }

    #[test]
    fn test_country_only_location() {
        let geo = sample().lookup("8.8.8.8").unwrap();

        assert_eq!(geo.country_code.as_deref(), Some("US"));
        assert!(geo.region_code.is_none());
    }

    #[test]
    fn test_unavailable_resolver() {
        let resolver = UnavailableGeoResolver;

        assert!(!resolver.is_available());
        assert!(resolver.lookup("1.2.3.4").is_none());
    }

    #[test]
    fn test_static_resolver_is_available() {
        assert!(sample().is_available());
        assert!(StaticGeoResolver::new().is_available());
    }

    #[test]
    fn test_from_iterator() {
        let resolver: StaticGeoResolver = [(
            "::1".parse::<IpAddr>().unwrap(),
            GeoLocation::new("SE", "27"),
        )]
        .into_iter()
        .collect();

        assert_eq!(resolver.lookup("::1"), Some(GeoLocation::new("SE", "27")));
    }

    #[test]
    fn test_resolvers_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StaticGeoResolver>();
        assert_send_sync::<UnavailableGeoResolver>();
        assert_send_sync::<MaxMindGeoResolver>();
    }
}
