use tokio_util::sync::CancellationToken;

use super::queue::RequestId;
use super::target::TargetId;

/// Returned to the caller for every accepted request.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    pub(crate) id: RequestId,
    pub(crate) url: String,
    pub(crate) target: TargetId,
    pub(crate) cancel: CancellationToken,
    pub(crate) served_from_cache: bool,
}

impl RequestHandle {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    /// True if the request was resolved synchronously from the cache.
    pub fn served_from_cache(&self) -> bool {
        self.served_from_cache
    }

    /// Cancel this request only. Observed when the fetch it waits on
    /// completes: the callback then reports `Cancelled`. The shared fetch keeps
    /// running for other waiters.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
