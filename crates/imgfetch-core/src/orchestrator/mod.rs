//! Download orchestrator.
//!
//! Owns the cache store, the pending request queue and the set of active
//! fetches, and is the only place any of them is mutated. For each request it
//! decides whether to serve from cache, join a fetch already running for the
//! URL, or start a new one; when a fetch completes it fans the result out to
//! every queued request for that URL in FIFO order.
//!
//! # Driving
//!
//! Fetches run as tokio tasks and post their results to a channel owned by the
//! orchestrator. Nothing is delivered until the host drains it with
//! [`Orchestrator::pump`] (non-blocking, for frame loops),
//! [`Orchestrator::next_completion`] or [`Orchestrator::run_until_idle`].
//!
//! ```text
//! request ──► policy check ──hit──► bind + callback
//!                 │ miss
//!                 ▼
//!            RequestQueue ──first for URL──► Transport task
//!                 ▲                                │
//!                 └──── fan-out ◄── completion ◄───┘
//! ```

mod active;
mod error;
mod fanout;
mod intake;
mod stats;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::{CacheStore, DEFAULT_COOL_TIME_MINUTES};
use crate::config::ImgfetchConfig;
use crate::persist::Persistence;
use crate::request::{FetchPolicy, RequestQueue, TargetHandle};
use crate::transport::Transport;

use active::{ActiveFetch, FetchCompletion};

pub use error::{InvalidInput, OrchestratorError};
pub use stats::OrchestratorStats;

/// Builder for an [`Orchestrator`].
pub struct OrchestratorBuilder {
    transport: Arc<dyn Transport>,
    persistence: Option<Arc<dyn Persistence>>,
    cool_time_minutes: u32,
    default_policy: FetchPolicy,
    fetch_timeout: Option<Duration>,
    runtime: Option<tokio::runtime::Handle>,
}

impl OrchestratorBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            persistence: None,
            cool_time_minutes: DEFAULT_COOL_TIME_MINUTES,
            default_policy: FetchPolicy::default(),
            fetch_timeout: None,
            runtime: None,
        }
    }

    /// Apply cool time, default policy and fetch timeout from `cfg`.
    pub fn from_config(cfg: &ImgfetchConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(transport)
            .cool_time_minutes(cfg.cool_time_minutes)
            .default_policy(cfg.default_policy)
            .fetch_timeout(cfg.fetch_timeout())
    }

    pub fn persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Cool time given to newly created cache entries.
    pub fn cool_time_minutes(mut self, minutes: u32) -> Self {
        self.cool_time_minutes = minutes;
        self
    }

    pub fn default_policy(mut self, policy: FetchPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Runtime that fetch tasks are spawned on. Defaults to the current one.
    pub fn runtime(mut self, handle: tokio::runtime::Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<Orchestrator, OrchestratorError> {
        let runtime = match self.runtime {
            Some(h) => h,
            None => tokio::runtime::Handle::try_current()?,
        };
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Ok(Orchestrator {
            cache: CacheStore::new(self.cool_time_minutes),
            queue: RequestQueue::new(),
            active: HashMap::new(),
            transport: self.transport,
            persistence: self.persistence,
            default_policy: self.default_policy,
            fetch_timeout: self.fetch_timeout,
            runtime,
            completions_tx,
            completions_rx,
            next_request_id: 1,
            next_fetch_id: 1,
            saves: Vec::new(),
            stats: OrchestratorStats::default(),
        })
    }
}

/// Coordinates cache, pending requests and one transport fetch per URL.
pub struct Orchestrator {
    cache: CacheStore,
    queue: RequestQueue,
    active: HashMap<String, ActiveFetch>,
    transport: Arc<dyn Transport>,
    persistence: Option<Arc<dyn Persistence>>,
    default_policy: FetchPolicy,
    fetch_timeout: Option<Duration>,
    runtime: tokio::runtime::Handle,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    next_request_id: u64,
    next_fetch_id: u64,
    saves: Vec<JoinHandle<()>>,
    stats: OrchestratorStats,
}

impl Orchestrator {
    pub fn builder(transport: Arc<dyn Transport>) -> OrchestratorBuilder {
        OrchestratorBuilder::new(transport)
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Direct access to the cache store, e.g. to prime it with images obtained elsewhere.
    pub fn cache_mut(&mut self) -> &mut CacheStore {
        &mut self.cache
    }

    pub fn default_policy(&self) -> FetchPolicy {
        self.default_policy
    }

    pub fn stats(&self) -> OrchestratorStats {
        self.stats
    }

    pub fn is_fetching(&self, url: &str) -> bool {
        self.active.contains_key(url)
    }

    pub fn active_fetches(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    /// How long the fetch for `url` has been running.
    pub fn fetch_elapsed(&self, url: &str) -> Option<Duration> {
        self.active.get(url).map(|a| a.started_at.elapsed())
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn pending_for_url(&self, url: &str) -> usize {
        self.queue.count_for_url(url)
    }

    /// Drop the cached image for `url` (memory only).
    pub fn remove_cached(&mut self, url: &str) -> bool {
        let removed = self.cache.remove(url);
        if removed {
            tracing::info!(url, "removed cached image");
        }
        removed
    }

    /// Drop every cached image (memory only). Returns how many entries were removed.
    pub fn remove_all_cached(&mut self) -> usize {
        let n = self.cache.remove_all();
        tracing::info!(entries = n, "removed all cached images");
        n
    }

    /// Change the cool time of an existing cache entry; no-op if there is none.
    pub fn set_cool_time(&mut self, url: &str, minutes: u32) -> bool {
        self.cache.set_cool_time(url, minutes)
    }

    /// Ask the transport fetching `url` to abort. Every request waiting on it
    /// then resolves as cancelled once the transport reports back.
    pub fn cancel_url(&self, url: &str) -> Result<(), OrchestratorError> {
        match self.active.get(url) {
            Some(active) => {
                active.cancel.cancel();
                tracing::info!(url, fetch = active.id.0, "cancel download requested");
                Ok(())
            }
            None => {
                tracing::warn!(url, "cancel requested for a URL with no active fetch");
                Err(OrchestratorError::NoActiveFetch {
                    url: url.to_string(),
                })
            }
        }
    }

    /// Mark every queued request on `target` as cancelled. The fetches keep
    /// running; their results still land in the cache.
    pub fn cancel_target(&mut self, target: &TargetHandle) -> usize {
        let n = self.queue.cancel_target(target.id());
        if n > 0 {
            tracing::debug!(target_id = %target.id(), requests = n, "cancelled requests for target");
        }
        n
    }

    /// Cancel every active fetch. Returns how many were signalled.
    pub fn cancel_all(&self) -> usize {
        for active in self.active.values() {
            active.cancel.cancel();
        }
        tracing::info!(fetches = self.active.len(), "cancel all downloads");
        self.active.len()
    }

    /// Process every completion that is already waiting, without blocking.
    /// Returns how many fetches were finalized.
    pub fn pump(&mut self) -> usize {
        self.saves.retain(|h| !h.is_finished());
        let mut n = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.complete(completion) {
                n += 1;
            }
        }
        n
    }

    /// Wait for the next fetch to finish and fan out its result. Returns the
    /// URL that completed, or `None` right away when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<String> {
        loop {
            if self.active.is_empty() {
                return None;
            }
            let completion = self.completions_rx.recv().await?;
            let url = completion.url.clone();
            if self.complete(completion) {
                return Some(url);
            }
        }
    }

    /// Process completions until no fetch is active, then wait for disk
    /// writes. Returns how many fetches finished.
    pub async fn run_until_idle(&mut self) -> usize {
        let mut n = 0;
        while self.next_completion().await.is_some() {
            n += 1;
        }
        self.flush_persistence().await;
        n
    }

    /// Wait for every disk cache write started so far.
    pub async fn flush_persistence(&mut self) {
        for saving in std::mem::take(&mut self.saves) {
            if let Err(e) = saving.await {
                tracing::warn!("disk cache save task failed: {}", e);
            }
        }
    }
}
