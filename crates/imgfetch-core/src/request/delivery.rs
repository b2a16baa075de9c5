//! Terminal result handed to a request's completion callback.

use crate::decoded::Image;

/// Why a request resolved the way it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Served synchronously from the cache (memory or disk).
    CacheHit,
    /// Served by a completed network fetch.
    Fetched,
    /// The fetch failed; the target was left untouched.
    Failed(String),
    /// The request (or its fetch) was cancelled; the target was left untouched.
    Cancelled,
}

/// Passed to the callback exactly once per accepted request.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub url: String,
    pub status: DeliveryStatus,
    pub image: Option<Image>,
}

/// Completion callback. `FnOnce` so it cannot be invoked twice.
pub type OnComplete = Box<dyn FnOnce(Delivery) + Send>;

impl Delivery {
    pub(crate) fn cache_hit(url: &str, image: Image) -> Self {
        Self {
            url: url.to_string(),
            status: DeliveryStatus::CacheHit,
            image: Some(image),
        }
    }

    pub(crate) fn fetched(url: &str, image: Image) -> Self {
        Self {
            url: url.to_string(),
            status: DeliveryStatus::Fetched,
            image: Some(image),
        }
    }

    pub(crate) fn failed(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status: DeliveryStatus::Failed(reason.into()),
            image: None,
        }
    }

    pub(crate) fn cancelled(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status: DeliveryStatus::Cancelled,
            image: None,
        }
    }

    /// True for cache hits and successful fetches; `image` is then present.
    pub fn is_success(&self) -> bool {
        matches!(self.status, DeliveryStatus::CacheHit | DeliveryStatus::Fetched)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == DeliveryStatus::Cancelled
    }
}
