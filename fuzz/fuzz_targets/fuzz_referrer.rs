//! Fuzz testing for the request classification inputs.
//!
//! Everything here comes straight from request headers, so none of it may
//! panic on any input:
//!
//! - `validate_referrer`: arbitrary `Referer` values
//! - `resolve_client_ip` + `GeoResolver::lookup`: arbitrary `X-Forwarded-For` values
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_referrer -- -max_total_time=60
//! ```

#![no_main]

use std::net::SocketAddr;

use geo_pixel::config::DEFAULT_TRUSTED_REFERRER_SUFFIX;
use geo_pixel::middleware::resolve_client_ip;
use geo_pixel::models::{Region, classify};
use geo_pixel::validation::validate_referrer;
use geo_pixel::{GeoResolver, StaticGeoResolver};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let _ = validate_referrer(Some(s), DEFAULT_TRUSTED_REFERRER_SUFFIX);
    let _ = validate_referrer(Some(s), s);

    let peer = SocketAddr::from(([127, 0, 0, 1], 8080));
    let ip = resolve_client_ip(Some(s.into()), &peer);
    let location = StaticGeoResolver::new().lookup(&ip);
    for region in Region::ALL {
        let _ = classify(location.as_ref(), region.region_set());
    }
});
