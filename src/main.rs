use immich_share_proxy::{
    AlbumKeys, AppState, Config, ImmichCatalogClient, ImmichClient, create_app,
};

use clap::Parser;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Immich share proxy: serves shared albums and assets without exposing API keys
#[derive(Parser, Debug)]
#[command(name = "immich-share-proxy")]
#[command(about = "Proxy that attaches the owning Immich API key to album requests", long_about = None)]
struct Cli {
    /// Path to the configuration file (YAML, or JSON with a .json extension)
    #[arg(short, long, env = "CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Address to listen on, overrides `listen` from the config file
    #[arg(short, long, env = "LISTEN")]
    listen: Option<String>,

    /// Log level, overrides `logLevel` from the config file
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

/// RUST_LOG wins over the configured level
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
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

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration from file
    let mut config = match Config::from_file(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing("info");
            tracing::error!("Failed to load config file '{}': {}", cli.config, e);
            tracing::error!(
                "Configuration file is required. Use --config <path> or set CONFIG_PATH environment variable."
            );
            std::process::exit(1);
        }
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(level) = cli.log_level {
        config.log_level = Some(level);
    }

    // Initialize tracing
    init_tracing(&config.log_filter());
    tracing::info!("Loaded configuration from {}", cli.config);

    let schedule = match config.refresh_schedule() {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let cors = match config.cors.as_ref().map(|c| c.layer()).transpose() {
        Ok(cors) => cors,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Proxy starting, listen {}, forwarded to {}",
        config.listen,
        schedule.base_url
    );

    let http = reqwest::Client::new();
    let album_keys = Arc::new(AlbumKeys::new(
        config.credentials(),
        schedule.enabled,
        schedule.base_url.clone(),
        Arc::new(ImmichCatalogClient::new(http.clone())),
    ));

    // Warm the album key cache before accepting requests
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_task = match schedule.interval {
        Some(interval) => {
            album_keys
                .start_refreshing(shutdown_rx, interval, &schedule.base_url)
                .await
        }
        None => {
            tracing::warn!("Albums sync is disabled, album keys are resolved on demand");
            None
        }
    };

    let immich = ImmichClient::new(http, schedule.base_url.clone(), Arc::clone(&album_keys));
    let app = create_app(AppState::new(immich), cors);

    // Start server
    let listener = match tokio::net::TcpListener::bind(&config.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen, e);
            std::process::exit(1);
        }
    };
    match listener.local_addr() {
        Ok(addr) => tracing::info!("Immich share proxy listening on {}", addr),
        Err(_) => tracing::info!("Immich share proxy listening on {}", config.listen),
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    // Stop the background refresh
    let _ = shutdown_tx.send(true);
    if let Some(task) = refresh_task
        && let Err(e) = task.await
    {
        tracing::error!("Albums refresh task failed: {}", e);
    }
}
