//! Application configuration loaded from environment variables.
//!
//! # Configuration Hierarchy
//!
//! All configuration is loaded from environment variables with sensible defaults
//! for development. In production, configure via environment variables or a `.env` file.
//!
//! # Variables
//!
//! - `HOST` / `PORT`: Bind address (default: `0.0.0.0:8080`)
//! - `TRUSTED_REFERRER_SUFFIX`: Host suffix a `Referer` must end with (default: `aftonbladet.se`)
//! - `GEOIP_DB_PATH`: MaxMind database file (default: `GeoLite2-City.mmdb`)
//! - `RUST_LOG`: Log filter directives (default: `info`)
//! - `LOG_FORMAT`: `text` or `json` (default: `text`)
//! - `METRICS_PORT`: Prometheus exporter port, `0` disables (default: 9090)
//!
//! Region groups are deliberately absent: they are fixed per deployment and
//! live in [`crate::models::region`].

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// Referrer suffix used when `TRUSTED_REFERRER_SUFFIX` is unset.
pub const DEFAULT_TRUSTED_REFERRER_SUFFIX: &str = "aftonbladet.se";

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 8080)
    pub port: u16,

    // =========================================================================
    // Classification Configuration
    // =========================================================================
    /// Referrer hosts must end with this suffix (case-sensitive)
    pub trusted_referrer_suffix: String,

    /// Path to the MaxMind GeoIP2/GeoLite2 City database
    pub geoip_db_path: PathBuf,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Log filter directives from `RUST_LOG` (e.g., "info", "geo_pixel=debug")
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Port for Prometheus metrics endpoint (default: 9090, 0 = disabled)
    pub metrics_port: u16,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if any value is invalid
    /// (e.g., non-numeric PORT value, empty referrer suffix).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let config = Self {
            // Server
            host: env::var("HOST").unwrap_or(defaults.host),
            port: Self::parse_env("PORT", defaults.port)?,

            // Classification
            trusted_referrer_suffix: env::var("TRUSTED_REFERRER_SUFFIX")
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.trusted_referrer_suffix),
            geoip_db_path: env::var("GEOIP_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.geoip_db_path),

            // Observability
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: Self::parse_env("LOG_FORMAT", defaults.log_format)?,
            metrics_port: Self::parse_env("METRICS_PORT", defaults.metrics_port)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency and correctness.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    fn validate(&self) -> AppResult<()> {
        // An empty suffix would let every referrer host through
        if self.trusted_referrer_suffix.is_empty() {
            return Err(AppError::ConfigError(
                "TRUSTED_REFERRER_SUFFIX must not be empty".to_string(),
            ));
        }

        if self.geoip_db_path.as_os_str().is_empty() {
            return Err(AppError::ConfigError(
                "GEOIP_DB_PATH must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        self.metrics_enabled()
            .then(|| std::net::SocketAddr::from(([0, 0, 0, 0], self.metrics_port)))
    }

    /// Build the log filter from `log_level`, falling back to `info` when the
    /// directives do not parse.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            trusted_referrer_suffix: DEFAULT_TRUSTED_REFERRER_SUFFIX.to_string(),
            geoip_db_path: PathBuf::from("GeoLite2-City.mmdb"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            metrics_port: 9090,
        }
    }
}
