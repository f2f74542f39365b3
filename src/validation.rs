//! Referrer validation.
//!
//! The `Referer` header is the only access-control signal this service has:
//! a pixel is only served to pages hosted under the trusted domain suffix.
//!
//! # Rules
//!
//! - Header absent: [`RejectionReason::MissingOrUntrusted`]
//! - Header not parseable as an absolute URL, or using a scheme outside
//!   [`KNOWN_SCHEMES`]: [`RejectionReason::Malformed`]
//! - Parsed host does not end with the suffix (or has no host):
//!   [`RejectionReason::MissingOrUntrusted`]
//! - Otherwise: [`ReferrerOutcome::Accepted`]
//!
//! The comparison is a case-sensitive suffix match on the host as produced
//! by URL parsing. `aftonbladet.se.evil.com` is rejected.

use url::Url;

use crate::error::{AppError, AppResult};

/// URL schemes a referrer may use. Anything else (`android-app:`,
/// `javascript:`, ...) counts as malformed.
pub const KNOWN_SCHEMES: &[&str] = &["http", "https", "ftp", "file", "jar", "mailto"];

/// Why a referrer was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// No header, no host, or host outside the trusted suffix.
    MissingOrUntrusted,
    /// Header present but not a URL.
    Malformed,
}

/// Result of checking a `Referer` header against the trusted suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferrerOutcome {
    Accepted,
    Rejected(RejectionReason),
}

impl ReferrerOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ReferrerOutcome::Accepted)
    }
}

/// Validate a raw `Referer` header value against a trusted host suffix.
pub fn validate_referrer(referrer: Option<&str>, trusted_suffix: &str) -> ReferrerOutcome {
    let Some(raw) = referrer else {
        return ReferrerOutcome::Rejected(RejectionReason::MissingOrUntrusted);
    };

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return ReferrerOutcome::Rejected(RejectionReason::Malformed),
    };

    if !KNOWN_SCHEMES.contains(&url.scheme()) {
        return ReferrerOutcome::Rejected(RejectionReason::Malformed);
    }

    match url.host_str() {
        Some(host) if host.ends_with(trusted_suffix) => ReferrerOutcome::Accepted,
        _ => ReferrerOutcome::Rejected(RejectionReason::MissingOrUntrusted),
    }
}

/// Validate a referrer and convert a rejection into the matching [`AppError`].
///
/// Handlers use this with `?` so a rejection short-circuits into a 403/400.
pub fn require_trusted_referrer(referrer: Option<&str>, trusted_suffix: &str) -> AppResult<()> {
    match validate_referrer(referrer, trusted_suffix) {
        ReferrerOutcome::Accepted => Ok(()),
        ReferrerOutcome::Rejected(RejectionReason::MissingOrUntrusted) => {
            Err(AppError::ReferrerRejected(referrer.map(str::to_string)))
        }
        ReferrerOutcome::Rejected(RejectionReason::Malformed) => Err(AppError::ReferrerMalformed(
            referrer.unwrap_or_default().to_string(),
        )),
    }
}
