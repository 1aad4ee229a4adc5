//! Stripdex search service binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use stripdex_core::{close_all, Closer, WordsClient};
use stripdex_search::{
    router, run_refresher, BusCloser, Config, NatsListener, SearchService, SqliteStorage,
};

/// Phrase search service.
#[derive(Parser, Debug)]
#[command(name = "stripdex-search")]
#[command(about = "Phrase search service", long_about = None)]
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
    let words = Arc::new(WordsClient::new(&cfg.words_address)?);
    let service = Arc::new(SearchService::new(storage, words));

    let refresher = tokio::spawn(run_refresher(service.clone(), cfg.index_ttl));

    let listener = NatsListener::connect(&cfg.broker_address, &cfg.topic).await?;
    let bus_client = listener.client();
    let bus_task = tokio::spawn(listener.listen(service.clone()));

    let tcp = tokio::net::TcpListener::bind(&cfg.address).await?;
    tracing::info!(addr = %cfg.address, "starting search service");

    axum::serve(tcp, router(service))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
                return;
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    refresher.abort();
    bus_task.abort();

    let mut closers: Vec<Box<dyn Closer>> = vec![Box::new(BusCloser(bus_client))];
    close_all(&mut closers).await;

    Ok(())
}
