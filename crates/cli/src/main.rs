//! Command Line Interface for the liquidity fee report.
mod config;
mod job;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::Parser;
use config::Cli;
use dotenv::dotenv;
use job::ReportJob;
use lp_report_data::{
    Delivery, Notifier, NotifyError, PositionSource, RevertProvider, TelegramNotifier,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prints the report instead of delivering it.
struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        println!("{text}");
        Ok(Delivery::Sent)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.job_config();
    let now = Utc::now().with_timezone(&config.anchor.offset);

    info!(
        mode = %config.mode,
        configured = config.account.is_some(),
        dry_run = cli.dry_run,
        "Starting report job"
    );

    let source = RevertProvider::new(&cli.api_url, cli.timeout())
        .context("building position API client")?;

    if cli.dry_run {
        return execute(ReportJob::new(source, StdoutNotifier, config), now).await;
    }

    let notifier = TelegramNotifier::new(cli.telegram_credentials(), cli.timeout())
        .context("building Telegram client")?;
    execute(ReportJob::new(source, notifier, config), now).await
}

async fn execute<S: PositionSource, N: Notifier>(
    job: ReportJob<S, N>,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<()> {
    let outcome = job.run(now).await?;
    info!(
        delivery = ?outcome.delivery,
        bytes = outcome.report.len(),
        "Report job finished"
    );
    Ok(())
}
