//! Outstanding debt reconstruction from a position's cash-flow log.

use crate::entities::cash_flow::{CashFlow, CashFlowKind};
use rust_decimal::Decimal;
use tracing::debug;

/// Estimates the USD debt still owed on a position.
///
/// The latest borrow/repay entry carrying a `total_debt` snapshot is
/// authoritative; on equal timestamps the later entry in the log wins. Only
/// when no snapshot exists are borrows and repays netted from their direct
/// USD values. Entries without one are skipped rather than priced from
/// quantities. The result is never negative.
pub fn outstanding_debt(cash_flows: &[CashFlow]) -> Decimal {
    let debt_flows = || cash_flows.iter().filter(|cf| cf.kind.is_debt());

    let mut latest: Option<(i64, Decimal)> = None;
    for cf in debt_flows() {
        let Some(total) = cf.total_debt else {
            continue;
        };
        let ts = cf.timestamp_ms.unwrap_or(0);
        if latest.is_none_or(|(best_ts, _)| ts >= best_ts) {
            latest = Some((ts, total));
        }
    }
    if let Some((ts, total)) = latest {
        debug!(timestamp_ms = ts, total_debt = %total, "Debt from latest snapshot");
        return total.max(Decimal::ZERO);
    }

    let (borrowed, repaid) = debt_flows().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(borrowed, repaid), cf| match (cf.kind, cf.usd_value) {
            (CashFlowKind::Borrow, Some(usd)) => (borrowed.saturating_add(usd.abs()), repaid),
            (CashFlowKind::Repay, Some(usd)) => (borrowed, repaid.saturating_add(usd.abs())),
            _ => (borrowed, repaid),
        },
    );
    debug!(borrowed = %borrowed, repaid = %repaid, "Debt from borrow/repay totals");
    (borrowed - repaid).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    fn flows(value: Value) -> Vec<CashFlow> {
        value
            .as_array()
            .unwrap()
            .iter()
            .filter_map(CashFlow::from_value)
            .collect()
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let cfs = flows(json!([
            {"type": "borrow", "total_debt": 100, "timestamp": 1},
            {"type": "repay", "total_debt": 40, "timestamp": 2}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(40));
    }

    #[test]
    fn test_snapshot_order_is_by_timestamp_not_position() {
        let cfs = flows(json!([
            {"type": "lendor-repay", "total_debt": 40, "timestamp": 1_700_000_200},
            {"type": "lendor-borrow", "total_debt": 100, "timestamp": 1_700_000_100}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(40));
    }

    #[test]
    fn test_equal_timestamps_take_later_entry() {
        let cfs = flows(json!([
            {"type": "lendor-borrow", "total_debt": 100, "timestamp": 5},
            {"type": "lendor-repay", "total_debt": 60, "timestamp": 5}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(60));
    }

    #[test]
    fn test_mixed_timestamp_units() {
        // 1_700_000_000_500 ms is later than 1_700_000_000 s
        let cfs = flows(json!([
            {"type": "lendor-borrow", "total_debt": 100, "timestamp": 1_700_000_000_500_i64},
            {"type": "lendor-repay", "total_debt": 10, "timestamp": 1_700_000_000}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(100));
    }

    #[test]
    fn test_negative_snapshot_is_floored() {
        let cfs = flows(json!([{"type": "repay", "total_debt": -3, "timestamp": 1}]));
        assert_eq!(outstanding_debt(&cfs), Decimal::ZERO);
    }

    #[test]
    fn test_fallback_nets_usd_values() {
        let cfs = flows(json!([
            {"type": "borrow", "amount_usd": 100},
            {"type": "repay", "amount_usd": 30}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(70));
    }

    #[test]
    fn test_fallback_uses_synonyms_and_absolute_values() {
        let cfs = flows(json!([
            {"type": "lendor-borrow", "valueUsd": "-250"},
            {"type": "lendor-repay", "usd": 50},
            {"type": "lendor-repay", "amount0": 10, "prices": {"token0": {"usd": 5}}},
            {"type": "fees-collected", "amount_usd": 999}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(200));
    }

    #[test]
    fn test_fallback_floors_at_zero() {
        let cfs = flows(json!([
            {"type": "borrow", "amount_usd": 10},
            {"type": "repay", "amount_usd": 30}
        ]));
        assert_eq!(outstanding_debt(&cfs), Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_on_other_types_is_ignored() {
        let cfs = flows(json!([
            {"type": "deposit", "total_debt": 500, "timestamp": 9},
            {"type": "borrow", "amount_usd": 20}
        ]));
        assert_eq!(outstanding_debt(&cfs), dec!(20));
    }

    #[test]
    fn test_empty_log() {
        assert_eq!(outstanding_debt(&[]), Decimal::ZERO);
    }
}
