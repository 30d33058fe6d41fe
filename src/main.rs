//! tidewatch
//!
//! Tidal flood watch for a single coastal station:
//! - Scrapes the station's tide table on a clock-aligned cadence
//! - Replaces each day's stored tides atomically
//! - Correlates heavy-rain alerts with high tides into a risk verdict

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use api::{router, AppState};
use ingest::{ScraperConfig, TideScraper};
use risk::RiskCorrelator;
use telemetry::{health, init_tracing_from_env};
use tide_core::RiskPolicy;
use tide_store::{check_connection, init_schema, StoreConfig, TideStore};
use worker::{PeriodicScheduler, ScheduleConfig, TideSyncWorker};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    store: StoreConfig,

    #[serde(default)]
    scraper: ScraperConfig,

    #[serde(default)]
    schedule: ScheduleConfig,

    #[serde(default)]
    risk: RiskPolicy,

    #[serde(default)]
    alerts: AlertsConfig,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct AlertsConfig {
    /// `area_description` of the alerts served
    #[serde(default = "default_alert_area")]
    area: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_alert_area() -> String {
    api::state::DEFAULT_ALERT_AREA.to_string()
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            area: default_alert_area(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreConfig::default(),
            scraper: ScraperConfig::default(),
            schedule: ScheduleConfig::default(),
            risk: RiskPolicy::default(),
            alerts: AlertsConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting tidewatch v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        database = %config.store.url,
        tide_url = %config.scraper.url,
        location = %config.scraper.location,
        threshold_m = config.risk.height_threshold_m,
        buffer_secs = config.risk.buffer_secs,
        "Loaded configuration"
    );

    // Store
    let store = Arc::new(
        TideStore::new(config.store.clone())
            .await
            .context("Failed to open tide store")?,
    );
    init_schema(&store)
        .await
        .context("Failed to initialize store schema")?;

    if check_connection(&store).await {
        health().store.set_healthy();
        info!("Store connection: healthy");
    } else {
        health().store.set_unhealthy("Connection failed");
        error!("Store connection: unhealthy");
    }

    // Ingestion
    let scraper =
        Arc::new(TideScraper::new(config.scraper.clone()).context("Failed to create tide scraper")?);
    let sync = Arc::new(TideSyncWorker::new(scraper, store.clone()));

    let cadence = config.schedule.cadence();
    let scheduler = Arc::new(PeriodicScheduler::new(sync.clone(), cadence));
    let scheduler_handle = scheduler
        .start()
        .context("Failed to start tide scheduler")?;

    // Risk
    let correlator = RiskCorrelator::new(store.clone(), config.risk.clone());

    let state = AppState::new(store.clone(), sync, correlator)
        .with_alert_area(config.alerts.area.clone())
        .with_location(config.scraper.location.clone());

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");

    scheduler.stop();
    if let Err(e) = scheduler_handle.await {
        warn!(error = %e, "Tide scheduler task ended abnormally");
    }

    store.inner().close().await;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = layered_config(env_source())?;
    apply_flat_overrides(config, |key| std::env::var(key).ok())
}

/// Nested keys as `TIDEWATCH_<SECTION>__<KEY>`, e.g. `TIDEWATCH_SCHEDULE__ALIGNED=false`.
fn env_source() -> config::Environment {
    config::Environment::with_prefix("TIDEWATCH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn layered_config(env: config::Environment) -> Result<Config> {
    config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(env)
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Flat names for the keys operators set most often, then validation.
fn apply_flat_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    if let Some(url) = var("TIDEWATCH_DATABASE_URL") {
        config.store.url = url;
    }
    if let Some(url) = var("TIDEWATCH_TIDE_URL") {
        config.scraper.url = url;
    }
    if let Some(raw) = var("TIDEWATCH_RISK_THRESHOLD_M") {
        config.risk.height_threshold_m = raw
            .trim()
            .parse()
            .with_context(|| format!("TIDEWATCH_RISK_THRESHOLD_M is not a number: {raw:?}"))?;
    }
    if let Some(raw) = var("TIDEWATCH_RISK_BUFFER_SECS") {
        config.risk.buffer_secs = raw
            .trim()
            .parse()
            .with_context(|| format!("TIDEWATCH_RISK_BUFFER_SECS is not a number: {raw:?}"))?;
    }
    if let Some(raw) = var("TIDEWATCH_FETCH_INTERVAL") {
        config.schedule.fetch_interval_secs = raw
            .trim()
            .parse()
            .with_context(|| format!("TIDEWATCH_FETCH_INTERVAL is not a number: {raw:?}"))?;
    }

    config.risk.validate().context("Invalid risk policy")?;

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
