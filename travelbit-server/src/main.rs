use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};
use travelbit_core::{CompletionBackend, OpenAiCompletionClient, TravelConfig};

use travelbit_server::http::{self, HttpState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "travelbit.toml")]
    config: String,

    /// Check store connectivity and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (local development)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match TravelConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging
    let default_level = config
        .service
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .init();

    let store = match travelbit_core::connect_store(&config.database).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open {} store: {}", config.database.backend, e);
            std::process::exit(1);
        }
    };

    if args.health {
        match store.health().await {
            Ok(v) => println!("✅ {} store reachable: {}", store.name(), v),
            Err(e) => {
                println!("❌ {} store check failed: {}", store.name(), e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if !config.completion.has_api_key() {
        tracing::warn!("OPENAI_API_KEY is not set; itinerary generation will fail until it is");
    }

    let completion: Arc<dyn CompletionBackend> =
        Arc::new(OpenAiCompletionClient::new(config.completion.clone())?);
    tracing::info!(
        store = store.name(),
        completion = completion.name(),
        model = %config.completion.model,
        "Travelbit backends ready"
    );

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = Arc::new(HttpState::new(config, store, completion));
    http::start_http_server(state, tx.subscribe()).await?;

    Ok(())
}
