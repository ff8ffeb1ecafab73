use anyhow::Context;
use clap::Parser;
use mvg_api::{AppState, create_app};
use mvg_core::BoardConfig;
use mvg_engine::Engine;
use std::path::PathBuf;
use std::sync::Arc;

/// Command line arguments for the mvg-board server
#[derive(Parser, Debug)]
#[command(name = "mvg-board")]
#[command(about = "Live public transport departure board")]
struct Args {
    /// Path to the board configuration JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt().pretty().init();

    // Load board configuration from JSON file
    let config_content = tokio::fs::read_to_string(&args.config)
        .await
        .with_context(|| format!("Failed to read config file '{}'", args.config.display()))?;

    let board_config = BoardConfig::from_json_str(&config_content)
        .with_context(|| format!("Failed to load config file '{}'", args.config.display()))?;

    tracing::info!(
        "Loaded board config from {}: {}",
        args.config.display(),
        board_config.station
    );

    // Start the board
    let (engine, requests) = Engine::initialize(board_config);
    let app_state = Arc::new(AppState::new(engine, requests));

    // Build our application with routes
    let app = create_app(app_state.clone());

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    match Arc::try_unwrap(app_state) {
        Ok(state) => state.into_engine().teardown(),
        Err(_) => tracing::warn!("Board state still in use at shutdown"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
