//! Transport: one cancellable asynchronous fetch of an image from a URL.
//!
//! The orchestrator owns one transport and calls [`Transport::fetch`] at most
//! once per URL at a time. A fetch must resolve exactly once; cancellation is
//! cooperative through the token passed in.

mod error;
mod http;

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::decoded::Image;

pub use error::FetchError;
pub use http::CurlTransport;

/// Result of one fetch.
pub type FetchResult = Result<Image, FetchError>;

/// Boxed future returned by [`Transport::fetch`].
pub type FetchFuture = Pin<Box<dyn Future<Output = FetchResult> + Send>>;

/// Fetches and decodes images. Implementations must stop promptly (and
/// resolve with [`FetchError::Cancelled`]) once `cancel` is triggered.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, url: String, cancel: CancellationToken) -> FetchFuture;
}
