//! ragloop CLI — the main entry point.
//!
//! Commands:
//! - `init`   — Write a starter configuration file
//! - `serve`  — Start the HTTP gateway server

use anyhow::Context;
use clap::{Parser, Subcommand};
use ragloop_agent::{CompletionLoop, ConversationAssembler, TurnService};
use ragloop_backends::{
    HttpKnowledgeService, HttpMemoryService, HttpSessionStore, HttpWeatherService,
    HttpWebSearchService,
};
use ragloop_config::AppConfig;
use ragloop_core::backend::SessionStore;
use ragloop_core::provider::Provider;
use ragloop_providers::OpenAiCompatProvider;
use ragloop_tools::{Dispatcher, builtin_registry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "ragloop",
    about = "RAG conversational assistant server",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter configuration file
    Init {
        /// Where to write the config
        #[arg(short, long, default_value = "ragloop.toml")]
        config: PathBuf,
    },

    /// Start the HTTP gateway server
    Serve {
        /// Path to the configuration file
        #[arg(short, long, default_value = "ragloop.toml")]
        config: PathBuf,

        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { config } => init(config),
        Commands::Serve { config, port } => serve(config, port).await,
    }
}

fn init(path: PathBuf) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(&path, AppConfig::default_toml())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    println!("Set provider.api_key (or RAGLOOP_API_KEY) before serving.");
    Ok(())
}

async fn serve(config_path: PathBuf, port_override: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let api_key = config
        .provider
        .api_key
        .clone()
        .context("no API key configured; set provider.api_key or RAGLOOP_API_KEY")?;
    let provider = Arc::new(OpenAiCompatProvider::new(
        &config.provider.base_url,
        api_key,
        Duration::from_secs(config.provider.timeout_secs),
    )?);

    // Startup probe only; an unreachable provider still surfaces per turn
    // as an in-band error chunk.
    match provider.health_check().await {
        Ok(true) => info!(provider = provider.name(), "Provider reachable"),
        Ok(false) => warn!(provider = provider.name(), "Provider health check failed"),
        Err(err) => warn!(error = %err, "Provider unreachable at startup"),
    }

    let backend_timeout = Duration::from_secs(config.backends.timeout_secs);
    let weather = Arc::new(HttpWeatherService::new(
        &config.backends.weather_url,
        backend_timeout,
    )?);
    let knowledge = Arc::new(HttpKnowledgeService::new(
        &config.backends.knowledge_url,
        backend_timeout,
    )?);
    let memory = Arc::new(HttpMemoryService::new(
        &config.backends.memory_url,
        backend_timeout,
    )?);
    let web = Arc::new(HttpWebSearchService::new(
        &config.backends.web_search_url,
        backend_timeout,
    )?);
    let store: Arc<dyn SessionStore> = Arc::new(HttpSessionStore::new(
        &config.backends.session_url,
        backend_timeout,
    )?);

    let registry = Arc::new(builtin_registry(weather, knowledge, memory, web));
    info!(tools = registry.len(), model = %config.provider.model, "Runtime assembled");

    let assembler = ConversationAssembler::new(
        store.clone(),
        config.agent.system_prompt_override.clone(),
        config.agent.history_turns,
    );
    let completion = CompletionLoop::new(
        provider,
        Arc::new(Dispatcher::new(registry.clone())),
        config.provider.model.clone(),
        config.provider.temperature,
    )
    .with_max_tokens(config.provider.max_tokens)
    .with_max_tool_rounds(config.agent.max_tool_rounds);

    let service = Arc::new(TurnService::new(
        assembler,
        completion,
        registry,
        store,
        config.agent.chunk_chars,
    ));

    ragloop_gateway::start(&config.gateway.host, config.gateway.port, service)
        .await
        .context("gateway server failed")?;
    Ok(())
}
