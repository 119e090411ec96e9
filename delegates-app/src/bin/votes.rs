use anyhow::{Context, Result};
use clap::Parser;
use delegates_app::setup::{load_config, log_config};
use delegates_common::observability::init_logging;
use delegates_votes::{DelegateSource, NationStatesClient, VoteChecker};
use std::path::PathBuf;
use tracing::info;

/// Print the current World Assembly votes of every delegate in the ranking.
#[derive(Debug, Parser)]
#[command(name = "delegate-votes", version)]
struct Cli {
    /// YAML config file; defaults to ./delegates.yaml when present.
    #[arg(long, env = "DELEGATES_CONFIG")]
    config: Option<PathBuf>,

    /// Delegate ranking to read instead of the configured one (URL or path).
    #[arg(long)]
    source: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref()).context("loading configuration")?;
    init_logging(log_config("delegate-votes", &cfg.logging))?;

    let votes = &cfg.votes;
    let raw_source = cli.source.as_deref().unwrap_or(&votes.source);
    let source = DelegateSource::parse(raw_source)?;
    let client = NationStatesClient::new(&votes.api_base, &votes.user_agent, votes.timeout())?;

    let delegates = client
        .delegates(&source)
        .await
        .with_context(|| format!("loading delegate ranking from {raw_source}"))?;
    info!(target: "votes", source = raw_source, delegates = delegates.len(), "ranking loaded");

    let checker = VoteChecker::new(client, votes.pause());
    for record in checker.check_all(&delegates).await {
        println!("{record}");
    }
    Ok(())
}
