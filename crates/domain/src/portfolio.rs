//! Per-run aggregates consumed by the report formatter.

use crate::entities::position::{Position, PositionId};
use crate::entities::token::{SymbolTable, TokenSlot};
use crate::enums::{AprSource, PositionStatus, ReportMode};
use crate::metrics::{FeeTally, WindowFees, aggregate_window, fee_apr, net_usd};
use crate::window::TimeWindow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display figures for one open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub nft_id: PositionId,
    pub status: PositionStatus,
    pub net_usd: Option<Decimal>,
    pub uncollected_usd: Decimal,
    pub uncollected_fees0: Decimal,
    pub uncollected_fees1: Decimal,
    pub symbol0: String,
    pub symbol1: String,
    /// Fees this position realized in the report window.
    pub realized_fees: FeeTally,
    /// APR from `realized_fees` over `net_usd`.
    pub realized_fee_apr: Option<Decimal>,
    /// APR precomputed by the position API.
    pub upstream_fee_apr: Option<Decimal>,
    /// Whichever of the two the configured [`AprSource`] selects.
    pub displayed_fee_apr: Option<Decimal>,
}

impl PositionReport {
    pub fn new(
        position: &Position,
        fees: &WindowFees,
        symbols: &SymbolTable,
        apr_source: AprSource,
    ) -> Self {
        let net = net_usd(position);
        let realized_fees = fees.for_position(&position.nft_id);
        let realized_fee_apr = fee_apr(Some(realized_fees.usd), net);
        let displayed_fee_apr = match apr_source {
            AprSource::Upstream => position.upstream_fee_apr,
            AprSource::Realized => realized_fee_apr,
        };

        Self {
            nft_id: position.nft_id.clone(),
            status: position.status(),
            net_usd: net,
            uncollected_usd: position.uncollected_usd.unwrap_or_default(),
            uncollected_fees0: position.uncollected_fees0.unwrap_or_default(),
            uncollected_fees1: position.uncollected_fees1.unwrap_or_default(),
            symbol0: symbols.resolve(position, TokenSlot::Token0),
            symbol1: symbols.resolve(position, TokenSlot::Token1),
            realized_fees,
            realized_fee_apr,
            upstream_fee_apr: position.upstream_fee_apr,
            displayed_fee_apr,
        }
    }
}

/// Everything a report needs, derived once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub mode: ReportMode,
    pub account: String,
    /// Realized fees over open and exited positions.
    pub fees: WindowFees,
    /// Sum of open positions' net value; unavailable nets count as zero.
    pub net_total: Decimal,
    pub uncollected_total: Decimal,
    pub fee_apr: Option<Decimal>,
    /// Open positions, in API order.
    pub positions: Vec<PositionReport>,
}

impl PortfolioSnapshot {
    /// Daily snapshot: window fees over all positions, per-position detail
    /// and totals over the open ones.
    pub fn daily(
        account: impl Into<String>,
        open: &[Position],
        exited: &[Position],
        window: TimeWindow,
        symbols: &SymbolTable,
        apr_source: AprSource,
    ) -> Self {
        let fees = aggregate_window(open.iter().chain(exited), window);
        let positions: Vec<PositionReport> = open
            .iter()
            .map(|p| PositionReport::new(p, &fees, symbols, apr_source))
            .collect();

        let net_total = positions
            .iter()
            .filter_map(|p| p.net_usd)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let uncollected_total = positions
            .iter()
            .map(|p| p.uncollected_usd)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let fee_apr = fee_apr(Some(fees.total.usd), Some(net_total));

        Self {
            mode: ReportMode::Daily,
            account: account.into(),
            fees,
            net_total,
            uncollected_total,
            fee_apr,
            positions,
        }
    }

    /// Weekly snapshot: realized fees only.
    pub fn weekly(
        account: impl Into<String>,
        open: &[Position],
        exited: &[Position],
        window: TimeWindow,
    ) -> Self {
        Self {
            mode: ReportMode::Weekly,
            account: account.into(),
            fees: aggregate_window(open.iter().chain(exited), window),
            net_total: Decimal::ZERO,
            uncollected_total: Decimal::ZERO,
            fee_apr: None,
            positions: Vec::new(),
        }
    }

    pub fn window(&self) -> &TimeWindow {
        &self.fees.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowAnchor;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn window() -> TimeWindow {
        let now = WindowAnchor::jst()
            .offset
            .with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .single()
            .unwrap();
        WindowAnchor::jst().daily(now)
    }

    fn fixture(w: &TimeWindow) -> (Vec<Position>, Vec<Position>) {
        let ts = (w.start + Duration::hours(1)).timestamp_millis();
        let open = Position::from_records(&[
            json!({
                "nft_id": 10,
                "in_range": true,
                "underlying_value": 1200,
                "fees_value": 2.5,
                "uncollected_fees0": 0.001,
                "uncollected_fees1": 2,
                "token0": "0x4200000000000000000000000000000000000006",
                "token1": {"symbol": "USDC"},
                "performance": {"hodl": {"fee_apr": 40}},
                "cash_flows": [
                    {"type": "lendor-borrow", "total_debt": 200, "timestamp": 1},
                    {"type": "fees-collected", "timestamp": ts, "amount_usd": 5}
                ]
            }),
            json!({"nft_id": 11, "in_range": false, "underlying_value": null}),
        ]);
        let exited = Position::from_records(&[json!({
            "nft_id": 3,
            "underlying_value": 0,
            "cash_flows": [{"type": "fees-collected", "timestamp": ts, "amount_usd": 5}]
        })]);
        (open, exited)
    }

    #[test]
    fn test_daily_snapshot() {
        let w = window();
        let (open, exited) = fixture(&w);
        let symbols = SymbolTable::with_base_tokens();
        let snap =
            PortfolioSnapshot::daily("0xsafe", &open, &exited, w, &symbols, AprSource::Upstream);

        assert_eq!(snap.fees.total.usd, dec!(10));
        assert_eq!(snap.fees.total.count, 2);
        assert_eq!(snap.net_total, dec!(1000));
        assert_eq!(snap.uncollected_total, dec!(2.5));
        assert_eq!(snap.fee_apr, Some(dec!(365)));
        assert_eq!(snap.positions.len(), 2);

        let first = &snap.positions[0];
        assert_eq!(first.symbol0, "WETH");
        assert_eq!(first.symbol1, "USDC");
        assert_eq!(first.realized_fee_apr, Some(dec!(182.5)));
        assert_eq!(first.upstream_fee_apr, Some(dec!(40)));
        assert_eq!(first.displayed_fee_apr, Some(dec!(40)));

        let second = &snap.positions[1];
        assert_eq!(second.status, PositionStatus::OutOfRange);
        assert_eq!(second.net_usd, None);
        assert_eq!(second.displayed_fee_apr, None);
    }

    #[test]
    fn test_realized_apr_source() {
        let w = window();
        let (open, exited) = fixture(&w);
        let snap = PortfolioSnapshot::daily(
            "0xsafe",
            &open,
            &exited,
            w,
            &SymbolTable::new(),
            AprSource::Realized,
        );
        assert_eq!(snap.positions[0].displayed_fee_apr, Some(dec!(182.5)));
        assert_eq!(snap.positions[0].symbol0, "TOKEN");
    }

    #[test]
    fn test_weekly_snapshot_counts_all_positions() {
        let w = window();
        let (open, exited) = fixture(&w);
        let snap = PortfolioSnapshot::weekly("0xsafe", &open, &exited, w);
        assert_eq!(snap.mode, ReportMode::Weekly);
        assert_eq!(snap.fees.total.usd, dec!(10));
        assert!(snap.positions.is_empty());
        assert_eq!(snap.fee_apr, None);
    }
}
