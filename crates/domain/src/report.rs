//! Plain-text rendering of a [`PortfolioSnapshot`].

use crate::enums::ReportMode;
use crate::portfolio::{PortfolioSnapshot, PositionReport};
use crate::window::TimeWindow;
use chrono::{DateTime, FixedOffset};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

pub const DEFAULT_TITLE: &str = "CBC Liquidity Mining";
/// Account placeholder shown when none is configured.
pub const ACCOUNT_NOT_SET: &str = "SAFE_NOT_SET";
pub const UNAVAILABLE: &str = "N/A";

const RULE: &str = "────────────────";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `$1,234.50`, or `N/A`.
pub fn fmt_money(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(&fixed(v, 2))),
        None => UNAVAILABLE.to_string(),
    }
}

/// `12.34%`, or `N/A`.
pub fn fmt_pct(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{}%", fixed(v, 2)),
        None => UNAVAILABLE.to_string(),
    }
}

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Renders snapshots into the fixed message layout.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    title: String,
    zone_label: String,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, "JST")
    }
}

impl ReportFormatter {
    pub fn new(title: impl Into<String>, zone_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            zone_label: zone_label.into(),
        }
    }

    pub fn render(&self, snapshot: &PortfolioSnapshot) -> String {
        match snapshot.mode {
            ReportMode::Daily => self.daily(snapshot),
            ReportMode::Weekly => self.weekly(snapshot),
        }
    }

    /// Message sent instead of a report when no account is configured.
    pub fn not_configured(&self) -> String {
        format!(
            "SAFE\n{ACCOUNT_NOT_SET}\n\n\
             Set SAFE_ADDRESS in the environment to enable reporting."
        )
    }

    fn daily(&self, snap: &PortfolioSnapshot) -> String {
        let fees = &snap.fees.total;
        let mut out = self.header("Daily", snap);
        let _ = writeln!(out, "・24h Realized Fees {}", fmt_money(Some(fees.usd)));
        let _ = writeln!(out, "・Fee APR(SAFE) {}", fmt_pct(snap.fee_apr));
        let _ = writeln!(out, "・Net Total {}", fmt_money(Some(snap.net_total)));
        let _ = writeln!(
            out,
            "・Uncollected Fees {}",
            fmt_money(Some(snap.uncollected_total))
        );
        let _ = writeln!(out, "・Transactions {}", fees.count);
        let _ = writeln!(out, "{}", self.period(snap.window()));
        for position in &snap.positions {
            out.push_str(&self.position_block(position));
        }
        out
    }

    fn weekly(&self, snap: &PortfolioSnapshot) -> String {
        let fees = &snap.fees.total;
        let mut out = self.header("Weekly", snap);
        let _ = writeln!(out, "・7d Realized Fees {}", fmt_money(Some(fees.usd)));
        let _ = writeln!(out, "・Transactions {}", fees.count);
        out.push_str(&self.period(snap.window()));
        out
    }

    fn header(&self, cadence: &str, snap: &PortfolioSnapshot) -> String {
        format!(
            "{} — {cadence}\nPeriod End: {}\n{RULE}\nSAFE\n{}\n\n",
            self.title,
            self.stamp(&snap.window().end),
            snap.account
        )
    }

    fn period(&self, window: &TimeWindow) -> String {
        format!(
            "・Period {} → {}",
            window.start.format(TIME_FORMAT),
            self.stamp(&window.end)
        )
    }

    fn stamp(&self, at: &DateTime<FixedOffset>) -> String {
        format!("{} {}", at.format(TIME_FORMAT), self.zone_label)
    }

    fn position_block(&self, p: &PositionReport) -> String {
        format!(
            "\nNFT {}\nStatus: {}\nNet: {}\nUncollected: {} USD\n\
             Uncollected Fees:\n{} {}\n{} {}\nFee APR: {}\n",
            p.nft_id,
            p.status,
            fmt_money(p.net_usd),
            fixed(p.uncollected_usd, 2),
            fixed(p.uncollected_fees0, 8),
            p.symbol0,
            fixed(p.uncollected_fees1, 6),
            p.symbol1,
            fmt_pct(p.displayed_fee_apr),
        )
    }
}
