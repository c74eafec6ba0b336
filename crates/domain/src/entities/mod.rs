pub mod cash_flow;
pub mod position;
pub mod token;

// Re-export for easier access
pub use cash_flow::{CashFlow, CashFlowKind};
pub use position::{Position, PositionId};
pub use token::{SymbolTable, TokenSlot};
