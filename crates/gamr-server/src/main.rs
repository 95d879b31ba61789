use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use gamr_server::config::{ConfigSource, ServerConfig};
use gamr_server::{build_app, seed_from_config};

#[tokio::main]
async fn main() {
    let (config, source) = ServerConfig::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match source {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "Loaded configuration");
        },
        ConfigSource::Defaults => tracing::info!("No gamr.toml found, using defaults"),
        ConfigSource::Invalid { path, reason } => {
            tracing::warn!(path = %path.display(), %reason, "Failed to parse config, using defaults");
        },
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let addr = config.listen_addr.clone();
    let (app, state) = match build_app(config) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open game store");
            std::process::exit(1);
        },
    };

    if let Err(e) = seed_from_config(&state).await {
        tracing::error!(error = %e, "Failed to seed game store");
        std::process::exit(1);
    }

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            std::process::exit(1);
        },
    };
    tracing::info!("gamr listening on http://{addr}/api/");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
    tracing::info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
