use crate::entities::cash_flow::{CashFlow, CashFlowKind};
use crate::entities::position::{Position, PositionId};
use crate::window::TimeWindow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Realized fees and the number of events that produced them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTally {
    pub usd: Decimal,
    pub count: u32,
}

impl FeeTally {
    fn record(&mut self, usd: Decimal) {
        self.usd = self.usd.saturating_add(usd);
        self.count += 1;
    }
}

impl std::ops::AddAssign for FeeTally {
    fn add_assign(&mut self, other: Self) {
        self.usd = self.usd.saturating_add(other.usd);
        self.count += other.count;
    }
}

/// USD value of a cash flow if it is a fee realization inside `window`.
///
/// Entries with no timestamp, or whose value is unresolvable or not
/// positive, do not qualify.
pub fn realized_fee(cf: &CashFlow, window: &TimeWindow) -> Option<Decimal> {
    if cf.kind != CashFlowKind::FeeRealization {
        return None;
    }
    let ts = cf.timestamp_ms?;
    if !window.contains_millis(ts) {
        return None;
    }
    cf.resolved_usd().filter(|usd| *usd > Decimal::ZERO)
}

/// Sums the realized fees of one cash-flow log inside `window`.
pub fn realized_fees(cash_flows: &[CashFlow], window: &TimeWindow) -> FeeTally {
    let mut tally = FeeTally::default();
    for usd in cash_flows.iter().filter_map(|cf| realized_fee(cf, window)) {
        trace!(usd = %usd, "Fee event in window");
        tally.record(usd);
    }
    tally
}

/// Realized fees across a set of positions, with per-position attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFees {
    pub window: TimeWindow,
    pub total: FeeTally,
    /// Only positions with at least one qualifying event appear here.
    pub by_position: BTreeMap<PositionId, FeeTally>,
}

impl WindowFees {
    pub fn for_position(&self, id: &PositionId) -> FeeTally {
        self.by_position.get(id).copied().unwrap_or_default()
    }
}

/// Aggregates realized fees for every position into one [`WindowFees`].
///
/// Positions sharing an id accumulate into the same entry.
pub fn aggregate_window<'a>(
    positions: impl IntoIterator<Item = &'a Position>,
    window: TimeWindow,
) -> WindowFees {
    let mut total = FeeTally::default();
    let mut by_position: BTreeMap<PositionId, FeeTally> = BTreeMap::new();
    let mut seen_types = BTreeSet::new();

    for position in positions {
        seen_types.extend(
            position
                .cash_flows
                .iter()
                .filter(|cf| !cf.raw_type.is_empty())
                .map(|cf| cf.raw_type.as_str()),
        );
        let tally = realized_fees(&position.cash_flows, &window);
        if tally.count > 0 {
            total += tally;
            *by_position.entry(position.nft_id.clone()).or_default() += tally;
        }
    }

    debug!(
        types = ?seen_types,
        fees_usd = %total.usd,
        count = total.count,
        "Aggregated fee window"
    );

    WindowFees {
        window,
        total,
        by_position,
    }
}
