//! Stripdex update service binary.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use stripdex_core::{close_all, Closer, WordsClient};
use stripdex_update::{router, Config, NatsNotifier, SqliteStorage, UpdateService, XkcdClient};

/// Catalog synchronization service.
#[derive(Parser, Debug)]
#[command(name = "stripdex-update")]
#[command(about = "Catalog synchronization service", long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cfg.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage = Arc::new(SqliteStorage::open(&cfg.db_address)?);
    let catalog = Arc::new(XkcdClient::new(&cfg.xkcd.url, cfg.xkcd.timeout)?);
    let words = Arc::new(WordsClient::new(&cfg.words_address)?);
    let notifier = NatsNotifier::connect(&cfg.broker_address, &cfg.topic).await?;

    let service = Arc::new(UpdateService::new(
        storage,
        catalog,
        words,
        Arc::new(notifier.clone()),
        cfg.xkcd.concurrency,
    )?);
    let shutdown = service.shutdown_flag();

    let listener = tokio::net::TcpListener::bind(&cfg.address).await?;
    tracing::info!(addr = %cfg.address, "starting update service");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
                return;
            }
            tracing::info!("shutdown signal received, draining ingest work");
            shutdown.store(true, Ordering::SeqCst);
        })
        .await?;

    let mut closers: Vec<Box<dyn Closer>> = vec![Box::new(notifier)];
    close_all(&mut closers).await;

    Ok(())
}
