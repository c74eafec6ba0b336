//! Command line and environment configuration.

use clap::Parser;
use lp_report_data::TelegramCredentials;
use lp_report_data::providers::revert::DEFAULT_BASE_URL;
use lp_report_domain::report::{ACCOUNT_NOT_SET, DEFAULT_TITLE};
use lp_report_domain::{AprSource, ReportMode, SymbolTable, WindowAnchor};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "lp-report")]
#[command(
    about = "Daily and weekly fee reports for a SAFE's liquidity positions",
    long_about = None
)]
pub struct Cli {
    /// Report cadence (daily or weekly)
    #[arg(long, env = "REPORT_MODE", default_value = "daily")]
    pub mode: ReportMode,

    /// Account (SAFE) address to report on
    #[arg(long, env = "SAFE_ADDRESS")]
    pub safe: Option<String>,

    /// Position API root
    #[arg(long, env = "REVERT_API", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Timeout for each HTTP call, in seconds
    #[arg(
        long,
        env = "HTTP_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Figure shown on each position's Fee APR line (upstream or realized)
    #[arg(long, env = "APR_SOURCE", default_value = "upstream")]
    pub apr_source: AprSource,

    /// Report title
    #[arg(long, env = "REPORT_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Extra token symbols as comma-separated `address=SYMBOL` pairs
    #[arg(long, env = "TOKEN_SYMBOLS", value_delimiter = ',', value_parser = parse_symbol)]
    pub token_symbols: Vec<(String, String)>,

    /// Telegram bot token
    #[arg(long, env = "TG_BOT_TOKEN", hide_env_values = true)]
    pub tg_bot_token: Option<String>,

    /// Telegram chat id
    #[arg(long, env = "TG_CHAT_ID")]
    pub tg_chat_id: Option<String>,

    /// Print the report instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_symbol(s: &str) -> Result<(String, String), String> {
    let (address, symbol) = s
        .split_once('=')
        .ok_or_else(|| format!("expected address=SYMBOL, got '{s}'"))?;
    let (address, symbol) = (address.trim(), symbol.trim());
    if address.is_empty() || symbol.is_empty() {
        return Err(format!("expected address=SYMBOL, got '{s}'"));
    }
    Ok((address.to_string(), symbol.to_string()))
}

/// Everything the job needs to produce one report.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub mode: ReportMode,
    /// `None` when no usable account is configured.
    pub account: Option<String>,
    pub apr_source: AprSource,
    pub title: String,
    pub anchor: WindowAnchor,
    pub symbols: SymbolTable,
}

impl JobConfig {
    pub fn new(mode: ReportMode, account: Option<String>) -> Self {
        Self {
            mode,
            account: account.and_then(normalize_account),
            apr_source: AprSource::default(),
            title: DEFAULT_TITLE.to_string(),
            anchor: WindowAnchor::jst(),
            symbols: SymbolTable::with_base_tokens(),
        }
    }
}

fn normalize_account(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == ACCOUNT_NOT_SET {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Cli {
    pub fn job_config(&self) -> JobConfig {
        let mut symbols = SymbolTable::with_base_tokens();
        for (address, symbol) in &self.token_symbols {
            symbols.insert(address, symbol.clone());
        }
        JobConfig {
            apr_source: self.apr_source,
            title: self.title.clone(),
            symbols,
            ..JobConfig::new(self.mode, self.safe.clone())
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn telegram_credentials(&self) -> Option<TelegramCredentials> {
        TelegramCredentials::from_parts(self.tg_bot_token.clone(), self.tg_chat_id.clone())
    }
}
