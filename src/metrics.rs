//! Prometheus metrics for application observability.
//!
//! Metrics are exposed via a dedicated HTTP listener (default port 9090).
//! Recording functions are no-ops until [`init_metrics`] installs the
//! exporter, so tests and metrics-disabled deployments pay nothing.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `geo_pixel_requests_total` - Pixel requests (labels: route, outcome)
//! - `geo_pixel_lookups_total` - Geo lookups (labels: result)
//!
//! ## Histograms
//! - `geo_pixel_lookup_duration_seconds` - Geo lookup duration
//!
//! ## Gauges
//! - `geo_pixel_geo_database_available` - 1 when the geo database loaded, 0 otherwise

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const REQUESTS_TOTAL: &str = "geo_pixel_requests_total";
    pub const LOOKUPS_TOTAL: &str = "geo_pixel_lookups_total";
    pub const LOOKUP_DURATION_SECONDS: &str = "geo_pixel_lookup_duration_seconds";
    pub const GEO_DATABASE_AVAILABLE: &str = "geo_pixel_geo_database_available";
}

/// Final outcome of a pixel request, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pixel,
    NoContent,
    Forbidden,
    BadRequest,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pixel => "pixel",
            Outcome::NoContent => "no_content",
            Outcome::Forbidden => "forbidden",
            Outcome::BadRequest => "bad_request",
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// # Errors
///
/// Returns a message if the exporter cannot be installed (e.g. port in use).
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::REQUESTS_TOTAL,
        "Total pixel requests by route and outcome"
    );
    describe_counter!(names::LOOKUPS_TOTAL, "Total geo lookups by result");
    describe_histogram!(
        names::LOOKUP_DURATION_SECONDS,
        "Geo lookup duration in seconds"
    );
    describe_gauge!(
        names::GEO_DATABASE_AVAILABLE,
        "Geo database status (1 = loaded, 0 = unavailable)"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record the outcome of a pixel request.
pub fn record_request(route: &str, outcome: Outcome) {
    counter!(names::REQUESTS_TOTAL, "route" => route.to_string(), "outcome" => outcome.as_str())
        .increment(1);
}

/// Record a geo lookup and its duration.
pub fn record_lookup(found: bool, duration_secs: f64) {
    let result = if found { "found" } else { "not_found" };
    counter!(names::LOOKUPS_TOTAL, "result" => result).increment(1);
    histogram!(names::LOOKUP_DURATION_SECONDS).record(duration_secs);
}

/// Update geo database availability gauge.
pub fn set_geo_database_available(available: bool) {
    gauge!(names::GEO_DATABASE_AVAILABLE).set(if available { 1.0 } else { 0.0 });
}
