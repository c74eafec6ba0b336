//! Position data providers.

pub mod revert;

use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only source of an account's positions and operation log.
///
/// Responses are returned as opaque JSON; shaping them is the domain's job.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Positions held by `account`; `active` selects open or exited ones.
    async fn positions(&self, account: &str, active: bool) -> Result<Value, ProviderError>;

    /// The account's historical operation log.
    async fn operations(&self, account: &str) -> Result<Value, ProviderError>;
}
