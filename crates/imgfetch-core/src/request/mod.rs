//! Display requests: policy, target identity, pending queue and delivery.
//!
//! A request binds a URL to a display target under a [`FetchPolicy`]. Requests
//! that cannot be served from cache wait in the [`RequestQueue`] until the
//! fetch for their URL completes; each carries its own cancellation token,
//! checked when results are fanned out.

mod delivery;
mod handle;
mod policy;
mod queue;
mod target;

pub use delivery::{Delivery, DeliveryStatus, OnComplete};
pub use handle::RequestHandle;
pub use policy::{FetchPolicy, UnknownPolicy};
pub use queue::{PendingRequest, RequestId, RequestQueue};
pub use target::{ImageTarget, TargetHandle, TargetId};

/// Input to [`crate::Orchestrator::request`].
pub struct ImageRequest {
    pub(crate) url: String,
    pub(crate) target: TargetHandle,
    pub(crate) policy: Option<FetchPolicy>,
    pub(crate) on_complete: Option<OnComplete>,
}

impl ImageRequest {
    pub fn new(url: impl Into<String>, target: TargetHandle) -> Self {
        Self {
            url: url.into(),
            target,
            policy: None,
            on_complete: None,
        }
    }

    /// Override the orchestrator's default policy for this request.
    pub fn policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Delivery) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }
}
