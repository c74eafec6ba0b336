//! Fee, net value and APR derivation for liquidity positions.
//!
//! This crate turns raw position-API JSON into report text:
//! - Normalization of irregular response envelopes and numeric fields
//! - Typed positions and cash flows
//! - Token symbol resolution from an injected address table
//! - Outstanding debt reconstruction
//! - Realized-fee aggregation over cutoff-anchored time windows
//! - Net value and fee APR metrics
//! - Portfolio snapshots and report rendering
//!
//! Nothing here performs I/O and nothing here fails: unresolvable inputs
//! degrade to zero contributions or to `None` ("N/A" in the report).

/// Position and cash-flow entities.
pub mod entities;
/// Configuration enums.
pub mod enums;
/// Debt, fee and APR metrics.
pub mod metrics;
/// JSON envelope and number coercion.
pub mod normalize;
/// Per-run aggregates.
pub mod portfolio;
/// Report text rendering.
pub mod report;
/// Cutoff-anchored time windows.
pub mod window;

pub use entities::{CashFlow, CashFlowKind, Position, PositionId, SymbolTable, TokenSlot};
pub use enums::{AprSource, ParseEnumError, PositionStatus, ReportMode};
pub use portfolio::{PortfolioSnapshot, PositionReport};
pub use report::ReportFormatter;
pub use window::{TimeWindow, WindowAnchor};
