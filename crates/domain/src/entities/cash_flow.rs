use crate::normalize::{decimal, decimal_field, epoch_millis, first_decimal};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Direct USD value field names, in priority order.
pub const USD_VALUE_KEYS: [&str; 5] = ["amount_usd", "usd", "value_usd", "valueUsd", "amountUsd"];

const QUANTITY0_KEYS: [&str; 4] = ["collected_fees_token0", "claimed_token0", "fees0", "amount0"];
const QUANTITY1_KEYS: [&str; 4] = ["collected_fees_token1", "claimed_token1", "fees1", "amount1"];

const FEE_MARKERS: [&str; 3] = ["fee", "collect", "claim"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowKind {
    Borrow,
    Repay,
    /// Fee collection or claim.
    FeeRealization,
    Other,
}

impl CashFlowKind {
    /// Classifies a raw cash-flow `type` string.
    pub fn classify(raw: &str) -> Self {
        let t = raw.trim().to_lowercase();
        match t.as_str() {
            "lendor-borrow" | "borrow" => Self::Borrow,
            "lendor-repay" | "repay" => Self::Repay,
            _ if FEE_MARKERS.iter().any(|m| t.contains(m)) => Self::FeeRealization,
            _ => Self::Other,
        }
    }

    pub fn is_debt(self) -> bool {
        matches!(self, Self::Borrow | Self::Repay)
    }
}

/// A single ledger event on a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub kind: CashFlowKind,
    /// Lower-cased `type` as reported.
    pub raw_type: String,
    pub timestamp_ms: Option<i64>,
    /// Outstanding debt snapshot recorded with the event.
    pub total_debt: Option<Decimal>,
    pub usd_value: Option<Decimal>,
    pub quantity0: Option<Decimal>,
    pub quantity1: Option<Decimal>,
    pub price0_usd: Option<Decimal>,
    pub price1_usd: Option<Decimal>,
}

impl CashFlow {
    /// Reads a cash flow from an upstream record. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let raw_type = match value.get("type") {
            Some(Value::String(s)) => s.trim().to_lowercase(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string().to_lowercase(),
        };
        let prices = value.get("prices");
        let price = |slot: &str| {
            prices
                .and_then(|p| p.get(slot))
                .and_then(|t| t.get("usd"))
                .and_then(decimal)
        };

        Some(Self {
            kind: CashFlowKind::classify(&raw_type),
            timestamp_ms: value.get("timestamp").and_then(epoch_millis),
            total_debt: decimal_field(value, "total_debt"),
            usd_value: first_decimal(value, &USD_VALUE_KEYS),
            quantity0: first_decimal(value, &QUANTITY0_KEYS),
            quantity1: first_decimal(value, &QUANTITY1_KEYS),
            price0_usd: price("token0"),
            price1_usd: price("token1"),
            raw_type,
        })
    }

    /// USD value of the event: the direct field when present, otherwise
    /// `|q0| * p0 + |q1| * p1` from the embedded price snapshot.
    ///
    /// A side with no quantity or no price contributes nothing. Returns `None`
    /// when neither a direct value nor any priced quantity is available.
    pub fn resolved_usd(&self) -> Option<Decimal> {
        if let Some(usd) = self.usd_value {
            return Some(usd);
        }
        let side = |q: Option<Decimal>, p: Option<Decimal>| match (q, p) {
            (Some(q), Some(p)) => q.abs().checked_mul(p),
            _ => None,
        };
        let legs = [
            side(self.quantity0, self.price0_usd),
            side(self.quantity1, self.price1_usd),
        ];
        let mut total: Option<Decimal> = None;
        for leg in legs.into_iter().flatten() {
            total = Some(total.unwrap_or(Decimal::ZERO).checked_add(leg)?);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_classify() {
        assert_eq!(CashFlowKind::classify("lendor-borrow"), CashFlowKind::Borrow);
        assert_eq!(CashFlowKind::classify(" BORROW "), CashFlowKind::Borrow);
        assert_eq!(CashFlowKind::classify("lendor-repay"), CashFlowKind::Repay);
        assert_eq!(
            CashFlowKind::classify("fees-collected"),
            CashFlowKind::FeeRealization
        );
        assert_eq!(
            CashFlowKind::classify("reward-claim"),
            CashFlowKind::FeeRealization
        );
        assert_eq!(CashFlowKind::classify("deposit"), CashFlowKind::Other);
        assert_eq!(CashFlowKind::classify(""), CashFlowKind::Other);
    }

    #[test]
    fn test_from_value_reads_synonyms() {
        let cf = CashFlow::from_value(&json!({
            "type": "Fees-Collected",
            "timestamp": 1_700_000_000,
            "valueUsd": "4.5",
            "fees0": 1,
            "amount1": "2",
            "prices": {"token0": {"usd": 3}, "token1": {"usd": "0.5"}}
        }))
        .unwrap();

        assert_eq!(cf.kind, CashFlowKind::FeeRealization);
        assert_eq!(cf.raw_type, "fees-collected");
        assert_eq!(cf.timestamp_ms, Some(1_700_000_000_000));
        assert_eq!(cf.usd_value, Some(dec!(4.5)));
        assert_eq!(cf.quantity0, Some(dec!(1)));
        assert_eq!(cf.quantity1, Some(dec!(2)));
        assert_eq!(cf.price1_usd, Some(dec!(0.5)));
    }

    #[test]
    fn test_explicit_zero_quantity_is_kept() {
        let cf = CashFlow::from_value(&json!({
            "type": "fees-collected",
            "collected_fees_token0": 0,
            "amount0": 5,
            "prices": {"token0": {"usd": 2}}
        }))
        .unwrap();
        assert_eq!(cf.quantity0, Some(dec!(0)));
        assert_eq!(cf.resolved_usd(), Some(dec!(0)));
    }

    #[test]
    fn test_non_object_is_skipped() {
        assert!(CashFlow::from_value(&json!("fees-collected")).is_none());
        assert!(CashFlow::from_value(&json!(null)).is_none());
    }

    #[test]
    fn test_resolved_usd_prefers_direct_value() {
        let cf = CashFlow::from_value(&json!({
            "type": "fees-collected",
            "amount_usd": 10,
            "collected_fees_token0": 2,
            "prices": {"token0": {"usd": 3}}
        }))
        .unwrap();
        assert_eq!(cf.resolved_usd(), Some(dec!(10)));
    }

    #[test]
    fn test_resolved_usd_from_quantities() {
        let cf = CashFlow::from_value(&json!({
            "type": "fees-collected",
            "collected_fees_token0": -2,
            "collected_fees_token1": 4,
            "prices": {"token0": {"usd": 3}, "token1": {"usd": 0.25}}
        }))
        .unwrap();
        assert_eq!(cf.resolved_usd(), Some(dec!(7)));
    }

    #[test]
    fn test_resolved_usd_unavailable() {
        let cf = CashFlow::from_value(&json!({
            "type": "fees-collected",
            "collected_fees_token0": 2
        }))
        .unwrap();
        assert_eq!(cf.resolved_usd(), None);
    }
}
