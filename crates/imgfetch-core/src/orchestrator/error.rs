//! Errors surfaced synchronously by the orchestrator API.

/// Request rejected before anything was queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("empty URL")]
    EmptyUrl,
    #[error("target is missing or has been dropped")]
    MissingTarget,
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("invalid request: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// `cancel_url` for a URL that has nothing in flight.
    #[error("no active fetch for {url}")]
    NoActiveFetch { url: String },
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
