use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error types with appropriate HTTP status codes.
///
/// # Request-Path Errors
///
/// Only the referrer variants are ever produced while serving a request,
/// and both render as an empty body:
///
/// - `ReferrerRejected` - header missing or host outside the trusted suffix (403)
/// - `ReferrerMalformed` - header present but not a parseable URL (400)
///
/// Geo lookup misses and unknown routes are not errors; they degrade to 204
/// inside the handler.
///
/// # Startup Errors
///
/// `ConfigError` and `GeoDatabase` surface while the process boots. A geo
/// database failure is logged and absorbed by falling back to an
/// unavailable resolver rather than aborting.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Referrer missing or untrusted: {0:?}")]
    ReferrerRejected(Option<String>),

    #[error("Referrer malformed: {0}")]
    ReferrerMalformed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Geo database unavailable: {0}")]
    GeoDatabase(String),
}

impl AppError {
    /// HTTP status this error renders as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ReferrerRejected(_) => StatusCode::FORBIDDEN,
            AppError::ReferrerMalformed(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) | AppError::GeoDatabase(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Rejections are routine traffic, keep them at diagnostic level
        match &self {
            AppError::ReferrerRejected(referrer) => {
                tracing::debug!(status = status.as_u16(), ?referrer, "Referrer not ok");
            }
            AppError::ReferrerMalformed(referrer) => {
                tracing::debug!(status = status.as_u16(), %referrer, "Referrer malformed");
            }
            AppError::ConfigError(_) | AppError::GeoDatabase(_) => {
                tracing::error!(error = %self, "Request failed");
            }
        }

        // Never a body: the pixel caller only inspects the status
        status.into_response()
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_is_forbidden() {
        let err = AppError::ReferrerRejected(None);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_malformed_is_bad_request() {
        let err = AppError::ReferrerMalformed("ht!tp://[".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_has_empty_body_and_no_content_type() {
        let response = AppError::ReferrerRejected(Some("https://evil.com".to_string()))
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get("content-type").is_none());
    }

    #[test]
    fn test_startup_errors_display() {
        let err = AppError::ConfigError("PORT".to_string());
        assert_eq!(err.to_string(), "Configuration error: PORT");

        let err = AppError::GeoDatabase("missing file".to_string());
        assert!(err.to_string().contains("missing file"));
    }
}
