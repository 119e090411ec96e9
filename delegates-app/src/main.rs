use anyhow::{Context, Result};
use clap::Parser;
use delegates_app::setup::{browser_settings, load_config, log_config};
use delegates_app::{Pipeline, RunSummary};
use delegates_common::observability::init_logging;
use delegates_drivers::WebDriverFetcher;
use delegates_publish::{GitPublisher, PublishOutcome, Publisher};
use std::path::PathBuf;
use tracing::{error, info};

/// Scrape the WA delegate ranking, extract it to JSON, and publish both files.
#[derive(Debug, Parser)]
#[command(name = "delegates", version)]
struct Cli {
    /// YAML config file; defaults to ./delegates.yaml when present.
    #[arg(long, env = "DELEGATES_CONFIG")]
    config: Option<PathBuf>,

    /// Write the artifacts but skip the commit and push.
    #[arg(long)]
    no_publish: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file, file over defaults)
    let cfg = load_config(cli.config.as_deref()).context("loading configuration")?;

    let log_path = init_logging(log_config("delegates", &cfg.logging))?;
    info!(target: "delegates", log = %log_path.display(), url = %cfg.fetch.url, "starting run");

    // 2) Collaborators
    let fetcher = WebDriverFetcher::new(browser_settings(&cfg.fetch));
    let git = GitPublisher::new(&cfg.publish.repo_path, &cfg.publish.remote);
    let publisher: Option<&dyn Publisher> =
        (cfg.publish.enabled && !cli.no_publish).then_some(&git as &dyn Publisher);

    // 3) Run
    match Pipeline::new(&cfg, &fetcher, publisher).run().await {
        Ok(summary) => {
            report(&summary);
            Ok(())
        }
        Err(e) => {
            error!(target: "delegates", stage = e.stage(), error = %e, "run failed");
            Err(e).with_context(|| "delegate scrape did not complete".to_string())
        }
    }
}

fn report(summary: &RunSummary) {
    info!(
        target: "delegates",
        markup = %summary.markup_path.display(),
        delegates_file = %summary.delegates_path.display(),
        delegates = summary.delegates,
        truncated = summary.truncated,
        "artifacts written"
    );
    match &summary.publish {
        Some(PublishOutcome::Pushed { commit, remote }) => {
            info!(target: "delegates", %commit, %remote, "published");
        }
        Some(PublishOutcome::Unchanged) => {
            info!(target: "delegates", "nothing new to publish");
        }
        None => {}
    }
}
