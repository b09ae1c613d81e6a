//! Dayoff server binary.

use anyhow::{Context, Result};
use clap::Parser;
use dayoff_calendar::{ChinaCalendar, HolidayCalendar};
use dayoff_core::config::AppConfig;
use dayoff_metadata::MetadataStore;
use dayoff_server::bootstrap::ensure_root_user;
use dayoff_server::{AppState, create_router};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Dayoff - per-user day-off lookups over a holiday calendar
#[derive(Parser, Debug)]
#[command(name = "dayoffd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "DAYOFF_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

/// Load configuration from the optional file and `DAYOFF_` environment variables.
///
/// Both layers sit on top of the built-in defaults, so a partial section such
/// as `DAYOFF_METADATA__PATH` alone keeps the default store type.
fn load_config(config_path: &str) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if std::path::Path::new(config_path).exists() {
        tracing::info!(config_path = %config_path, "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::info!(
            config_path = %config_path,
            "No config file found, using defaults and environment variables"
        );
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("DAYOFF_").split("__").ignore(&["config"]))
        .extract()
        .context("failed to load configuration")?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Dayoff v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    // Register Prometheus metrics
    dayoff_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    // Initialize metadata store
    let metadata = dayoff_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata health check failed")?;
    tracing::info!("Metadata store initialized");

    // Initialize the root identity
    let root = ensure_root_user(metadata.as_ref(), &config.root).await?;
    tracing::debug!(created = root.created, "Root identity ready");

    // Initialize the default calendar
    let calendar =
        ChinaCalendar::from_config(&config.calendar).context("failed to load holiday calendar")?;
    let years: Vec<i32> = calendar.supported_years().collect();
    tracing::info!(calendar = calendar.name(), years = ?years, "Holiday calendar loaded");

    // Create application state
    let state = AppState::new(config.clone(), metadata, Arc::new(calendar));

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
