//! casewatch - monitor new case law documents from the National
//! Archives Find Case Law feed.
//!
//! One invocation performs one run: fetch the feed for the query, diff
//! against the persisted known-set, notify on new cases, and replace
//! the snapshot. Scheduling repeated runs is left to cron or a systemd
//! timer.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::Context;
use casewatch_core::{
    DesktopAlert, DesktopNotifier, KeyringStore, MonitorConfig, SmtpMailer, monitor,
};
use casewatch_feed::FeedClient;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Monitor new case law documents from the National Archives.
#[derive(Debug, Parser)]
#[command(name = "casewatch", version, about)]
struct Cli {
    /// Search query to monitor (required)
    query: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casewatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = MonitorConfig::new(cli.query);

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let report = runtime.block_on(run(&config))?;

    if report.first_run {
        info!("first run completed, email sent");
    } else {
        info!(new_cases = report.new_cases.len(), "run completed");
    }
    Ok(())
}

async fn run(config: &MonitorConfig) -> anyhow::Result<monitor::RunReport> {
    let feed = FeedClient::new(&config.feed_url, config.per_page, config.http_timeout)
        .context("failed to build feed client")?;
    let mailer = SmtpMailer::new(&config.smtp_host, config.smtp_port);

    let report = monitor::run(
        config,
        &KeyringStore::new(),
        &feed,
        &mailer,
        &DesktopNotifier,
        &DesktopAlert,
    )
    .await?;

    Ok(report)
}
