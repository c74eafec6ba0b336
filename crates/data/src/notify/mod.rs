//! Report delivery.

pub mod telegram;

use crate::error::NotifyError;
use async_trait::async_trait;

/// Outcome of a delivery attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// No credentials were configured; nothing was sent.
    Skipped,
}

/// Sends a plain-text message to a channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError>;
}
