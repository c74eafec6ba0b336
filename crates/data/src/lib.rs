//! External collaborators of the report job.
//!
//! - [`PositionSource`]: read-only access to an account's positions and
//!   operation log, implemented over the Revert Finance HTTP API
//! - [`Notifier`]: delivery of the rendered report, implemented for Telegram
//!
//! Every call carries a bounded timeout and failures are returned to the
//! caller unchanged; there is no retry.

/// Error types.
pub mod error;
/// Report delivery.
pub mod notify;
/// Position data providers.
pub mod providers;

pub use error::{NotifyError, ProviderError};
pub use notify::{
    Delivery, Notifier,
    telegram::{TelegramCredentials, TelegramNotifier},
};
pub use providers::{PositionSource, revert::RevertProvider};
