//! FIFO queue of requests waiting on a fetch.

use std::collections::VecDeque;
use std::fmt;

use tokio_util::sync::CancellationToken;

use super::delivery::{Delivery, OnComplete};
use super::policy::FetchPolicy;
use super::target::{TargetHandle, TargetId};

/// Per-orchestrator sequence number of an accepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// A display request waiting for the fetch of its URL to finish.
pub struct PendingRequest {
    pub(crate) id: RequestId,
    pub(crate) url: String,
    pub(crate) target: TargetHandle,
    pub(crate) policy: FetchPolicy,
    pub(crate) on_complete: Option<OnComplete>,
    pub(crate) cancel: CancellationToken,
}

impl PendingRequest {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn target_id(&self) -> TargetId {
        self.target.id()
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Consume the request, invoking its callback (if any) with `delivery`.
    pub(crate) fn deliver(mut self, delivery: Delivery) {
        if let Some(cb) = self.on_complete.take() {
            cb(delivery);
        }
    }
}

impl fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("target", &self.target.id())
            .field("policy", &self.policy)
            .field("has_callback", &self.on_complete.is_some())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Ordered pending requests. At most one request per target is queued.
#[derive(Debug, Default)]
pub struct RequestQueue {
    items: VecDeque<PendingRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRequest> {
        self.items.iter()
    }

    /// Append `request`, first removing any queued request bound to the same
    /// target. The superseded request is returned so the caller can drop it.
    pub fn push(&mut self, request: PendingRequest) -> Option<PendingRequest> {
        let target = request.target.id();
        let superseded = self
            .items
            .iter()
            .position(|r| r.target.id() == target)
            .and_then(|idx| self.items.remove(idx));
        self.items.push_back(request);
        superseded
    }

    /// Mark every queued request on `target` as cancelled. Returns how many were newly cancelled.
    pub fn cancel_target(&mut self, target: TargetId) -> usize {
        let mut n = 0;
        for r in self.items.iter().filter(|r| r.target.id() == target) {
            if !r.cancel.is_cancelled() {
                r.cancel.cancel();
                n += 1;
            }
        }
        n
    }

    /// Remove and return every request for `url`, preserving queue order.
    pub fn take_for_url(&mut self, url: &str) -> Vec<PendingRequest> {
        let (matched, rest): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|r| r.url == url);
        self.items = rest;
        matched.into()
    }

    pub fn count_for_url(&self, url: &str) -> usize {
        self.items.iter().filter(|r| r.url == url).count()
    }

    pub fn contains_target(&self, target: TargetId) -> bool {
        self.items.iter().any(|r| r.target.id() == target)
    }
}
