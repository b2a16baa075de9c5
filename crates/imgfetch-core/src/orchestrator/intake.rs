//! Request intake: validation, the cache fast path, queueing and fetch start.

use std::time::SystemTime;

use tokio_util::sync::CancellationToken;

use crate::decoded::Image;
use crate::request::{
    Delivery, FetchPolicy, ImageRequest, PendingRequest, RequestHandle, RequestId,
};

use super::active::{spawn_fetch, ActiveFetch, FetchId};
use super::error::{InvalidInput, OrchestratorError};
use super::Orchestrator;

impl Orchestrator {
    /// Submit a display request.
    ///
    /// Served synchronously (target bound, callback invoked) when the policy
    /// accepts the cached image. Otherwise the request is queued and joins the
    /// fetch already running for its URL, or starts one. Any earlier request
    /// on the same target is cancelled, and superseded if this one is queued.
    ///
    /// A disk cache lookup, when memory has no image, reads and decodes the
    /// file on the calling thread.
    pub fn request(&mut self, req: ImageRequest) -> Result<RequestHandle, OrchestratorError> {
        self.stats.requests += 1;
        let ImageRequest {
            url,
            target,
            policy,
            on_complete,
        } = req;

        if url.is_empty() {
            return Err(self.reject(InvalidInput::EmptyUrl, &url));
        }
        if !target.is_alive() {
            return Err(self.reject(InvalidInput::MissingTarget, &url));
        }
        let policy = policy.unwrap_or(self.default_policy);

        // The target is being re-pointed; whatever it waited on no longer applies.
        let cancelled = self.queue.cancel_target(target.id());
        if cancelled > 0 {
            tracing::debug!(target_id = %target.id(), "cancelled previous request for target");
        }

        let id = RequestId(self.next_request_id);
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        let mut handle = RequestHandle {
            id,
            url: url.clone(),
            target: target.id(),
            cancel: cancel.clone(),
            served_from_cache: false,
        };

        if let Some(image) = self.cached_for(&url, policy) {
            self.stats.cache_hits += 1;
            tracing::debug!(url = %url, %policy, "serving image from cache");
            target.bind(&url, &image);
            if let Some(cb) = on_complete {
                cb(Delivery::cache_hit(&url, image));
            }
            handle.served_from_cache = true;
            return Ok(handle);
        }

        let pending = PendingRequest {
            id,
            url: url.clone(),
            target,
            policy,
            on_complete,
            cancel,
        };
        if let Some(old) = self.queue.push(pending) {
            self.stats.superseded += 1;
            tracing::debug!(url = %old.url(), request = old.id().0, "superseded pending request");
        }

        if self.active.contains_key(&url) {
            self.stats.coalesced += 1;
            tracing::debug!(
                url = %url,
                waiters = self.queue.count_for_url(&url),
                "joining in-flight fetch"
            );
            return Ok(handle);
        }

        self.cache.ensure(&url);
        self.start_fetch(&url);
        Ok(handle)
    }

    fn reject(&mut self, reason: InvalidInput, url: &str) -> OrchestratorError {
        self.stats.rejected += 1;
        tracing::error!(url, "rejected image request: {}", reason);
        reason.into()
    }

    /// The cached image `policy` allows serving for `url`, consulting
    /// persistence when memory has none.
    fn cached_for(&mut self, url: &str, policy: FetchPolicy) -> Option<Image> {
        if !policy.may_use_cache() {
            return None;
        }
        if self.cache.image(url).is_none() {
            self.restore_from_persistence(url);
        }
        let entry = self.cache.get(url)?;
        let image = entry.image()?;
        match policy {
            FetchPolicy::Caching => Some(image.clone()),
            FetchPolicy::CoolTime if entry.is_within_cool_time(SystemTime::now()) => {
                Some(image.clone())
            }
            _ => None,
        }
    }

    fn restore_from_persistence(&mut self, url: &str) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        match persistence.load(url) {
            Ok(Some((image, stored_at))) => {
                self.cache.upsert_at(url, image, stored_at);
                self.stats.disk_restores += 1;
                tracing::debug!(url, "restored image from disk cache");
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(url, "disk cache load failed: {:#}", e),
        }
    }

    fn start_fetch(&mut self, url: &str) {
        let fetch_id = FetchId(self.next_fetch_id);
        self.next_fetch_id += 1;
        let cancel = CancellationToken::new();
        self.active.insert(
            url.to_string(),
            ActiveFetch {
                id: fetch_id,
                cancel: cancel.clone(),
                started_at: std::time::Instant::now(),
            },
        );
        self.stats.fetches_started += 1;
        tracing::info!(url, fetch = fetch_id.0, "starting image fetch");

        let fut = self.transport.fetch(url.to_string(), cancel.clone());
        spawn_fetch(
            &self.runtime,
            url.to_string(),
            fetch_id,
            fut,
            cancel,
            self.fetch_timeout,
            self.completions_tx.clone(),
        );
    }
}
