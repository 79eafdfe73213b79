use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use reviewd::{AppState, build_router, init_tracing};
use reviewd_config::Config;
use reviewd_engine::Orchestrator;
use reviewd_llm::LlmClient;
use reviewd_store::MemoryStore;

#[derive(Parser, Debug)]
#[command(name = "reviewd", version, about = "Review submission API server")]
struct Cli {
    /// Address to listen on, overrides REVIEWD_BIND
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Enable debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose).map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let client = LlmClient::from_config(&config);
    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(client)),
        store: Arc::new(MemoryStore::new()),
    };

    info!(
        bind = %config.bind,
        provider = config.provider.as_str(),
        model = %config.model,
        "starting reviewd"
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    axum::serve(listener, build_router(state))
        .await
        .context("server error")?;

    Ok(())
}
