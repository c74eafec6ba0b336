use thiserror::Error;

/// Failure talking to the position API.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{url} returned an undecodable body: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure delivering a message.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The wrapped error never carries the request URL.
    #[error("message delivery failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("messaging endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),
}
