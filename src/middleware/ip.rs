//! Client IP resolution.
//!
//! Determines the address used for the geo lookup: the `X-Forwarded-For`
//! header when a fronting proxy set one, otherwise the transport peer.
//!
//! # Trust Model
//!
//! **The forwarded header is trusted verbatim.** No comma-separated proxy
//! chain is split and no IP format check is made: the whole header value is
//! handed to the geo resolver, which answers "unknown" for anything that is
//! not a single address. This keeps classification results identical to the
//! single-proxy deployment this service was built for. A client reaching the
//! service directly can choose its own region by setting the header; deploy
//! behind a proxy that overwrites it:
//!
//! ```nginx
//! proxy_set_header X-Forwarded-For $remote_addr;
//! ```

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::http::HeaderMap;
use tracing::trace;

/// Header carrying the original client address when behind a proxy.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Raw `X-Forwarded-For` value, if present and non-empty.
///
/// Bytes that are not UTF-8 are replaced rather than dropped, so a garbled
/// header still counts as present and resolves to an unknown location.
#[inline]
pub fn forwarded_for(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    headers
        .get(FORWARDED_FOR_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
        .filter(|value| !value.is_empty())
}

/// Resolve the client address used for classification.
///
/// Returns the forwarded value unchanged when present, otherwise the peer IP
/// rendered as a string. Never fails and never returns an empty string.
///
/// # Returns
///
/// `Cow<'a, str>` - Borrowed from the header when forwarded, owned for the
/// peer address.
#[inline]
pub fn resolve_client_ip<'a>(forwarded: Option<Cow<'a, str>>, peer: &SocketAddr) -> Cow<'a, str> {
    match forwarded {
        Some(ip) => {
            trace!(client_ip = %ip, "Using X-Forwarded-For as client IP");
            ip
        }
        None => Cow::Owned(peer.ip().to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "198.51.100.7:54321".parse().unwrap()
    }

    fn headers_with_xff(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR_HEADER, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_forwarded_for_used_verbatim() {
        let headers = headers_with_xff("1.2.3.4");
        let ip = resolve_client_ip(forwarded_for(&headers), &peer());

        assert_eq!(ip, "1.2.3.4");
        assert!(matches!(ip, Cow::Borrowed(_)));
    }

    #[test]
    fn test_proxy_chain_is_not_split() {
        let headers = headers_with_xff("192.168.1.1, 10.0.0.1");

        assert_eq!(
            resolve_client_ip(forwarded_for(&headers), &peer()),
            "192.168.1.1, 10.0.0.1"
        );
    }

    #[test]
    fn test_whitespace_preserved() {
        let headers = headers_with_xff("  203.0.113.50  ");

        assert_eq!(
            resolve_client_ip(forwarded_for(&headers), &peer()),
            "  203.0.113.50  "
        );
    }

    #[test]
    fn test_falls_back_to_peer_without_header() {
        let headers = HeaderMap::new();
        let ip = resolve_client_ip(forwarded_for(&headers), &peer());

        assert_eq!(ip, "198.51.100.7");
        assert!(matches!(ip, Cow::Owned(_)));
    }

    #[test]
    fn test_empty_header_falls_back_to_peer() {
        let headers = headers_with_xff("");

        assert_eq!(forwarded_for(&headers), None);
        assert_eq!(
            resolve_client_ip(forwarded_for(&headers), &peer()),
            "198.51.100.7"
        );
    }

    #[test]
    fn test_ipv6_peer() {
        let peer: SocketAddr = "[2001:db8::1]:443".parse().unwrap();

        assert_eq!(resolve_client_ip(None, &peer), "2001:db8::1");
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let name = axum::http::HeaderName::from_bytes(b"X-Forwarded-For").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(name, "8.8.8.8".parse().unwrap());

        assert_eq!(forwarded_for(&headers).as_deref(), Some("8.8.8.8"));
    }

    #[test]
    fn test_non_utf8_header_still_counts_as_present() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR_HEADER,
            axum::http::HeaderValue::from_bytes(b"1.2.3.4\xff").unwrap(),
        );
        let ip = resolve_client_ip(forwarded_for(&headers), &peer());

        assert_eq!(ip, "1.2.3.4\u{fffd}");
        assert!(ip.parse::<std::net::IpAddr>().is_err());
    }
}
