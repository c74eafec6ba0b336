//! Revert Finance position API.

use crate::error::ProviderError;
use crate::providers::PositionSource;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Public Revert Finance API root.
pub const DEFAULT_BASE_URL: &str = "https://api.revert.finance";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Revert Finance API.
#[derive(Debug, Clone)]
pub struct RevertProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RevertProvider {
    /// Creates a provider rooted at `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// URL of the Uniswap v3 (and v4) positions of `account`.
    pub fn positions_url(&self, account: &str) -> String {
        format!("{}/v1/positions/uniswapv3/account/{account}", self.base_url)
    }

    /// URL of the operation log of `account`.
    pub fn operations_url(&self, account: &str) -> String {
        format!("{}/v1/xp-operations/{account}", self.base_url)
    }

    async fn get_json(&self, url: String, query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        debug!(url = %url, ?query, "GET");
        let response = self
            .client
            .get(url.as_str())
            .query(query)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { url, status });
        }
        response
            .json::<Value>()
            .await
            .map_err(|source| ProviderError::Decode { url, source })
    }
}

#[async_trait]
impl PositionSource for RevertProvider {
    async fn positions(&self, account: &str, active: bool) -> Result<Value, ProviderError> {
        let flag = if active { "true" } else { "false" };
        let body = self
            .get_json(
                self.positions_url(account),
                &[("active", flag), ("with-v4", "true")],
            )
            .await?;
        info!(active, "Fetched positions");
        Ok(body)
    }

    async fn operations(&self, account: &str) -> Result<Value, ProviderError> {
        let body = self.get_json(self.operations_url(account), &[]).await?;
        info!("Fetched operations");
        Ok(body)
    }
}
