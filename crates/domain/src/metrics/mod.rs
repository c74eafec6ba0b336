use crate::entities::position::Position;
use rust_decimal::Decimal;

pub mod debt;
pub mod fees;

pub use debt::outstanding_debt;
pub use fees::{FeeTally, WindowFees, aggregate_window, realized_fee, realized_fees};

/// Days used to annualize a daily yield.
pub const DAYS_PER_YEAR: u32 = 365;

/// Underlying value less reconstructed debt. `None` when the position
/// reports no usable underlying value.
pub fn net_usd(position: &Position) -> Option<Decimal> {
    let underlying = position.underlying_value_usd?;
    underlying.checked_sub(outstanding_debt(&position.cash_flows))
}

/// Annualized fee APR in percent: `(fee / net) * 365 * 100`.
///
/// Unavailable (not zero) when either input is unknown, `net` is not
/// positive, or the arithmetic overflows.
pub fn fee_apr(fee_usd: Option<Decimal>, net_usd: Option<Decimal>) -> Option<Decimal> {
    let (fee, net) = (fee_usd?, net_usd?);
    if net <= Decimal::ZERO {
        return None;
    }
    fee.checked_div(net)?
        .checked_mul(Decimal::from(DAYS_PER_YEAR))?
        .checked_mul(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_fee_apr_literal_formula() {
        assert_eq!(fee_apr(Some(dec!(36.5)), Some(dec!(100))), Some(dec!(13322.5)));
        assert_eq!(fee_apr(Some(dec!(5)), Some(dec!(1000))), Some(dec!(182.5)));
    }

    #[test]
    fn test_fee_apr_unavailable() {
        assert_eq!(fee_apr(Some(dec!(1)), Some(Decimal::ZERO)), None);
        assert_eq!(fee_apr(Some(dec!(1)), Some(dec!(-50))), None);
        assert_eq!(fee_apr(None, Some(dec!(100))), None);
        assert_eq!(fee_apr(Some(dec!(1)), None), None);
    }

    #[test]
    fn test_fee_apr_zero_fee_is_zero_not_unavailable() {
        assert_eq!(fee_apr(Some(Decimal::ZERO), Some(dec!(100))), Some(Decimal::ZERO));
    }

    #[test]
    fn test_net_usd() {
        let pos = Position::from_value(&json!({
            "underlying_value": 1200,
            "cash_flows": [{"type": "lendor-borrow", "total_debt": 200, "timestamp": 1}]
        }))
        .unwrap();
        assert_eq!(net_usd(&pos), Some(dec!(1000)));

        let missing = Position::from_value(&json!({"underlying_value": "n/a"})).unwrap();
        assert_eq!(net_usd(&missing), None);
    }
}
