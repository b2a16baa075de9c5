//! Fetch error type reported by transports.

use std::time::Duration;

/// Why a single fetch did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// libcurl reported a transfer error (DNS, connect, timeout, ...).
    #[error("transfer failed: {0}")]
    Curl(String),
    /// Body was received but could not be decoded as an image.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Body exceeded the configured size limit.
    #[error("response larger than {limit} bytes")]
    TooLarge { limit: u64 },
    /// The fetch observed its cancellation token.
    #[error("cancelled")]
    Cancelled,
    /// The orchestrator deadline elapsed before the transport finished.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    /// The fetch task panicked or was dropped by the runtime.
    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Only an observed cancellation resolves requests as `Cancelled`; a
    /// deadline expiry is reported as a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e.to_string())
    }
}

impl From<image::ImageError> for FetchError {
    fn from(e: image::ImageError) -> Self {
        FetchError::Decode(e.to_string())
    }
}
