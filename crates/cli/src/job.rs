//! The report job: fetch, derive, render, deliver.

use crate::config::JobConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use lp_report_data::{Delivery, Notifier, PositionSource};
use lp_report_domain::normalize::as_records;
use lp_report_domain::{Position, PortfolioSnapshot, ReportFormatter, ReportMode};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub report: String,
    pub delivery: Delivery,
}

/// One report run over a position source and a notifier.
///
/// Calls are made strictly in sequence; the first failing call aborts the
/// run before anything is sent.
pub struct ReportJob<S, N> {
    source: S,
    notifier: N,
    config: JobConfig,
    formatter: ReportFormatter,
}

impl<S: PositionSource, N: Notifier> ReportJob<S, N> {
    pub fn new(source: S, notifier: N, config: JobConfig) -> Self {
        let formatter = ReportFormatter::new(config.title.clone(), config.anchor.label);
        Self {
            source,
            notifier,
            config,
            formatter,
        }
    }

    /// Builds the report for `now` and hands it to the notifier.
    ///
    /// # Errors
    /// Returns an error if any upstream call or the delivery fails.
    pub async fn run(&self, now: DateTime<FixedOffset>) -> Result<JobOutcome> {
        let report = self.build_report(now).await?;
        let delivery = self
            .notifier
            .send(&report)
            .await
            .context("delivering report")?;
        if delivery == Delivery::Skipped {
            warn!("Report was not delivered");
        }
        Ok(JobOutcome { report, delivery })
    }

    /// Renders the report text without delivering it.
    ///
    /// # Errors
    /// Returns an error if any upstream call fails.
    pub async fn build_report(&self, now: DateTime<FixedOffset>) -> Result<String> {
        let Some(account) = self.config.account.as_deref() else {
            warn!("SAFE_ADDRESS is not set, sending placeholder report");
            return Ok(self.formatter.not_configured());
        };

        info!(mode = %self.config.mode, account, "Building report");
        let open = self.fetch_positions(account, true).await?;
        let exited = self.fetch_positions(account, false).await?;

        let snapshot = match self.config.mode {
            ReportMode::Daily => {
                let operations = self
                    .source
                    .operations(account)
                    .await
                    .context("fetching operations")?;
                info!(
                    open = open.len(),
                    exited = exited.len(),
                    operations = as_records(&operations).len(),
                    "Fetched account data"
                );
                PortfolioSnapshot::daily(
                    account,
                    &open,
                    &exited,
                    self.config.anchor.daily(now),
                    &self.config.symbols,
                    self.config.apr_source,
                )
            }
            ReportMode::Weekly => {
                info!(open = open.len(), exited = exited.len(), "Fetched account data");
                PortfolioSnapshot::weekly(
                    account,
                    &open,
                    &exited,
                    self.config.anchor.rolling_weekly(now),
                )
            }
        };

        info!(
            fees_usd = %snapshot.fees.total.usd,
            transactions = snapshot.fees.total.count,
            net_total = %snapshot.net_total,
            "Derived portfolio snapshot"
        );
        Ok(self.formatter.render(&snapshot))
    }

    async fn fetch_positions(&self, account: &str, active: bool) -> Result<Vec<Position>> {
        let body = self
            .source
            .positions(account, active)
            .await
            .with_context(|| {
                let which = if active { "open" } else { "exited" };
                format!("fetching {which} positions")
            })?;
        let records = as_records(&body);
        log_shape(records, active);
        Ok(Position::from_records(records))
    }
}

fn log_shape(records: &[Value], active: bool) {
    let Some(first) = records.first().and_then(Value::as_object) else {
        debug!(active, count = records.len(), "No position records to inspect");
        return;
    };
    let keys: Vec<&str> = first.keys().map(String::as_str).take(60).collect();
    let cash_flows = first
        .get("cash_flows")
        .and_then(Value::as_array)
        .map(Vec::len);
    debug!(active, count = records.len(), ?keys, ?cash_flows, "Position record shape");
}
