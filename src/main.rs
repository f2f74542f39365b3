use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use geo_pixel::config::LogFormat;
use geo_pixel::metrics::{set_geo_database_available, try_init_metrics};
use geo_pixel::{
    AppState, Config, MaxMindGeoResolver, SharedGeoResolver, UnavailableGeoResolver, build_router,
    utils,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Initialize logging with the configured filter and format.
fn init_tracing(config: &Config) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_target(true)
        .with_thread_ids(true);

    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Open the geo database once. A failure is logged here and only here;
/// afterwards every lookup answers "unknown".
fn open_geo_resolver(config: &Config) -> SharedGeoResolver {
    match MaxMindGeoResolver::open(&config.geoip_db_path) {
        Ok(resolver) => {
            info!(
                path = %config.geoip_db_path.display(),
                database_type = resolver.database_type(),
                "GeoIP database loaded"
            );
            Arc::new(resolver)
        }
        Err(e) => {
            error!(
                error = %e,
                "Failed to load GeoIP database, all pixel requests will answer 204"
            );
            Arc::new(UnavailableGeoResolver)
        }
    }
}

/// Run the application, returning an exit code on error.
async fn run() -> Result<(), exitcode::ExitCode> {
    // Config is read before the subscriber exists, so report errors on stderr
    let config = Config::from_env().map_err(|e| {
        eprintln!("Configuration error: {e}");
        exitcode::CONFIG
    })?;

    init_tracing(&config);

    info!("Starting Geo Pixel v{}", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.host,
        port = %config.port,
        trusted_referrer_suffix = %config.trusted_referrer_suffix,
        "Configuration loaded"
    );

    if let Some(addr) = config.metrics_addr() {
        try_init_metrics(addr);
    }

    let resolver = open_geo_resolver(&config);
    set_geo_database_available(resolver.is_available());

    let state = AppState::new(resolver, config.clone());
    let app = build_router(state);

    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET  /is-norrland - Pixel if client is in Norrland");
    info!("  GET  /is-skane    - Pixel if client is in Skåne");
    info!("  GET  /health      - Health check");
    info!("  GET  /ready       - Readiness check");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(utils::shutdown_signal())
    .await
    .map_err(|e| {
        error!("Server error: {e}");
        exitcode::SOFTWARE
    })?;

    info!("Server shutdown complete");
    Ok(())
}
