//! Stripdex API gateway binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use stripdex_api::{router, Aaa, AppState, Config, RouterOptions, SearchClient, UpdateClient};
use stripdex_core::WordsClient;

/// Public REST gateway.
#[derive(Parser, Debug)]
#[command(name = "stripdex-api")]
#[command(about = "Public REST gateway for the stripdex services", long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Admin credentials usually live here during local development.
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
    }

    let cfg = Config::load(&args.config)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cfg.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let aaa = Aaa::new(cfg.token_ttl)?;

    let update_client = Arc::new(UpdateClient::new(&cfg.update_address)?);
    let search_client = Arc::new(SearchClient::new(&cfg.search_address)?);
    let words_client = Arc::new(stripdex_api::WordsPinger(WordsClient::new(
        &cfg.words_address,
    )?));

    let pingers: Vec<(&'static str, Arc<dyn stripdex_api::Pinger>)> = vec![
        ("update", update_client.clone()),
        ("search", search_client.clone()),
        ("words", words_client),
    ];
    let state = AppState {
        updater: update_client,
        searcher: search_client,
        pingers: Arc::new(pingers),
        aaa,
    };

    let options = RouterOptions {
        search_concurrency: cfg.search_concurrency,
        search_rate: cfg.search_rate,
        timeout: cfg.timeout,
    };

    let listener = tokio::net::TcpListener::bind(&cfg.address).await?;
    tracing::info!(addr = %cfg.address, "starting api gateway");

    axum::serve(listener, router(state, &options))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
                return;
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
