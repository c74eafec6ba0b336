use crate::entities::cash_flow::CashFlow;
use crate::enums::PositionStatus;
use crate::normalize::{as_records, decimal, decimal_field};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier used when a position carries no `nft_id`.
pub const UNKNOWN_NFT_ID: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub String);

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A liquidity position as returned by the position API.
///
/// Token references are kept as raw JSON because their shape varies
/// (inline object, bare address string, or absent); see
/// [`SymbolTable::resolve`](crate::entities::token::SymbolTable::resolve).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub nft_id: PositionId,
    pub token0: Value,
    pub token1: Value,
    /// Positional token descriptors, used when `token0`/`token1` do not resolve.
    pub tokens: Vec<Value>,
    pub in_range: Option<bool>,
    pub underlying_value_usd: Option<Decimal>,
    /// Uncollected fees in USD (`fees_value`).
    pub uncollected_usd: Option<Decimal>,
    pub uncollected_fees0: Option<Decimal>,
    pub uncollected_fees1: Option<Decimal>,
    /// Fee APR in percent as precomputed by the API.
    pub upstream_fee_apr: Option<Decimal>,
    pub cash_flows: Vec<CashFlow>,
}

impl Position {
    /// Reads a position from an upstream record. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let nft_id = match value.get("nft_id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => UNKNOWN_NFT_ID.to_string(),
        };
        let cash_flows = value
            .get("cash_flows")
            .map(as_records)
            .unwrap_or(&[])
            .iter()
            .filter_map(CashFlow::from_value)
            .collect();
        let upstream_fee_apr = value
            .get("performance")
            .and_then(|p| p.get("hodl"))
            .and_then(|h| h.get("fee_apr"))
            .and_then(decimal);

        Some(Self {
            nft_id: PositionId(nft_id),
            token0: value.get("token0").cloned().unwrap_or(Value::Null),
            token1: value.get("token1").cloned().unwrap_or(Value::Null),
            tokens: value
                .get("tokens")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            in_range: value.get("in_range").and_then(Value::as_bool),
            underlying_value_usd: decimal_field(value, "underlying_value"),
            uncollected_usd: decimal_field(value, "fees_value"),
            uncollected_fees0: decimal_field(value, "uncollected_fees0"),
            uncollected_fees1: decimal_field(value, "uncollected_fees1"),
            upstream_fee_apr,
            cash_flows,
        })
    }

    /// Parses every object in `records`, skipping anything that is not one.
    pub fn from_records(records: &[Value]) -> Vec<Self> {
        records.iter().filter_map(Self::from_value).collect()
    }

    pub fn status(&self) -> PositionStatus {
        PositionStatus::from_in_range(self.in_range)
    }
}
