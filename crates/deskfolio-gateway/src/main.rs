use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use deskfolio_core::{Config, PersonaGateway, Provider, UpstreamModel};

#[derive(Parser)]
#[command(name = "deskfolio-gateway")]
#[command(about = "Chat endpoint answering as the portfolio persona")]
#[command(version)]
struct Cli {
    /// Address to listen on (defaults to the configured gateway bind address)
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Upstream provider: gemini, ollama, claude, openai
    #[arg(long)]
    provider: Option<String>,

    /// Upstream model (defaults to the provider's default)
    #[arg(long)]
    model: Option<String>,

    /// List the provider's available models and exit
    #[arg(long)]
    list_models: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Config::new()
        }
    };

    let provider_name = cli
        .provider
        .as_deref()
        .or(config.provider.as_deref())
        .unwrap_or("gemini");
    let provider = Provider::from_str(provider_name)
        .ok_or_else(|| anyhow!("Unknown provider '{}'", provider_name))?;

    let upstream = UpstreamModel::from_config(&config, provider, cli.model.as_deref())?;

    if cli.list_models {
        return list_models(&upstream).await;
    }

    tracing::info!(
        provider = provider.display_name(),
        model = upstream.model(),
        "Upstream model ready"
    );

    let bind = cli.bind.unwrap_or_else(|| config.gateway_bind().to_string());
    let listener = TcpListener::bind(&bind).await?;

    let gateway = PersonaGateway::new(upstream, config.persona());
    deskfolio_gateway::serve(listener, Arc::new(gateway)).await
}

async fn list_models(upstream: &UpstreamModel) -> Result<()> {
    for model in upstream.available_models().await? {
        println!("{}", model);
    }
    Ok(())
}
