use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardcatalog_core::{feed_from_config, load_config, run_update, validate_config, CatalogService};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("update-cards v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("CARDCATALOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let data_dir = &config.catalog.data_dir;
    info!("Snapshot directory: {:?}", data_dir);
    info!("Upstream source: {:?}", config.upstream.source);

    // Fetch, build and persist
    let feed = feed_from_config(&config.upstream).context("Failed to create upstream feed")?;
    let report = run_update(feed.as_ref(), data_dir)
        .await
        .context("Catalog update failed")?;

    if report.skipped > 0 {
        warn!("Skipped {} malformed or unconvertible records", report.skipped);
    }

    // Load what was just written, the same way the service does at startup
    let service = CatalogService::global();
    service
        .initialize(data_dir, config.catalog.fixture_mode)
        .await
        .with_context(|| format!("Written snapshot in {:?} failed to load", data_dir))?;

    let stats = service.stats().context("Catalog not loaded after initialize")?;
    info!(
        cards = stats.cards,
        names = stats.names,
        name_keys = stats.name_keys,
        image_entries = stats.image_entries,
        card_images = stats.card_images,
        tree_buckets = stats.tree_buckets,
        full_names = stats.full_names,
        oracle_ids = stats.oracle_ids,
        skipped = report.skipped,
        "Catalog ready"
    );

    Ok(())
}
