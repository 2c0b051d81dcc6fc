mod api;
mod router;
mod state;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use vidhi_llm::LegalAssistant;

use crate::state::AppState;

/// HTTP front end for the legal document analyzer and Indian-law Q&A.
#[derive(Parser, Debug)]
#[command(name = "vidhi-server", version, about)]
struct Cli {
    /// Bind address (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Secrets TOML consulted when OPENAI_API_KEY is unset.
    #[arg(long, env = "VIDHI_SECRETS_FILE")]
    secrets_file: Option<std::path::PathBuf>,
}

fn load_config(cli: &Cli) -> vidhi_core::Config {
    vidhi_core::config::load_dotenv();
    let mut config = vidhi_core::Config::from_env();
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(path) = &cli.secrets_file {
        config.secrets_file = path.clone();
    }
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli);
    config.log_summary();

    let assistant = LegalAssistant::from_config(&config).context("failed to create completion client")?;
    if !assistant.is_configured() {
        warn!("No API key configured; /api/analyze and /api/ask will return 503 until one is provided");
    }

    let state = Arc::new(AppState::new(assistant, config.clone()));
    let app = router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
