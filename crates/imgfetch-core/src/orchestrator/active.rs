//! In-flight fetches: at most one per URL, each reporting exactly one completion.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::transport::{FetchError, FetchFuture, FetchResult};

/// Per-orchestrator sequence number of a started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchId(pub u64);

/// The one running fetch for a URL.
#[derive(Debug)]
pub(crate) struct ActiveFetch {
    pub(crate) id: FetchId,
    pub(crate) cancel: CancellationToken,
    pub(crate) started_at: Instant,
}

/// Message posted back to the orchestrator when a fetch task ends.
#[derive(Debug)]
pub(crate) struct FetchCompletion {
    pub(crate) url: String,
    pub(crate) fetch_id: FetchId,
    pub(crate) result: FetchResult,
}

/// Await the transport future, enforcing the optional deadline. On expiry the
/// transport's token is cancelled so it can wind down in the background.
async fn run_fetch(fut: FetchFuture, cancel: CancellationToken, timeout: Option<Duration>) -> FetchResult {
    match timeout {
        None => fut.await,
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(res) => res,
            Err(_) => {
                cancel.cancel();
                Err(FetchError::TimedOut(limit))
            }
        },
    }
}

/// Spawn the fetch on `runtime` and post its result to `tx`. The transport runs
/// in an inner task so a panic still produces a completion.
pub(crate) fn spawn_fetch(
    runtime: &tokio::runtime::Handle,
    url: String,
    fetch_id: FetchId,
    fut: FetchFuture,
    cancel: CancellationToken,
    timeout: Option<Duration>,
    tx: mpsc::UnboundedSender<FetchCompletion>,
) {
    let inner = runtime.clone();
    runtime.spawn(async move {
        let result = match inner.spawn(run_fetch(fut, cancel, timeout)).await {
            Ok(res) => res,
            Err(e) => Err(FetchError::Aborted(e.to_string())),
        };
        // Receiver gone means the orchestrator was dropped; nothing left to notify.
        let _ = tx.send(FetchCompletion {
            url,
            fetch_id,
            result,
        });
    });
}
