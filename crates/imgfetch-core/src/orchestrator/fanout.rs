//! Completion fan-out: finalize a fetch and resolve every request waiting on it.

use std::sync::Arc;

use crate::request::Delivery;
use crate::transport::FetchResult;

use super::active::FetchCompletion;
use super::Orchestrator;

impl Orchestrator {
    /// Finalize one fetch. Returns false if the completion did not belong to
    /// the active fetch for its URL.
    pub(super) fn complete(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion {
            url,
            fetch_id,
            result,
        } = completion;

        let is_current = self.active.get(&url).is_some_and(|a| a.id == fetch_id);
        let active = if is_current { self.active.remove(&url) } else { None };
        let Some(active) = active else {
            tracing::warn!(url = %url, fetch = fetch_id.0, "ignoring completion of inactive fetch");
            return false;
        };
        let elapsed = active.started_at.elapsed();

        match &result {
            Ok(image) => {
                self.stats.fetches_succeeded += 1;
                self.cache.upsert(&url, image.clone());
                self.save_to_persistence(&url, image);
                tracing::info!(
                    url = %url,
                    width = image.width(),
                    height = image.height(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "image fetch succeeded"
                );
            }
            Err(e) => {
                self.stats.fetches_failed += 1;
                tracing::info!(url = %url, elapsed_ms = elapsed.as_millis() as u64, "image fetch failed: {}", e);
            }
        }

        let waiters = self.queue.take_for_url(&url);
        tracing::debug!(url = %url, waiters = waiters.len(), "fanning out fetch result");
        for req in waiters {
            let delivery = if req.is_cancelled() {
                Delivery::cancelled(&url)
            } else {
                Self::delivery_for(&url, &req.target, &result)
            };
            if delivery.is_cancelled() {
                self.stats.deliveries_cancelled += 1;
            }
            req.deliver(delivery);
        }
        true
    }

    fn delivery_for(
        url: &str,
        target: &crate::request::TargetHandle,
        result: &FetchResult,
    ) -> Delivery {
        match result {
            Ok(image) => {
                if !target.bind(url, image) {
                    tracing::debug!(url, target_id = %target.id(), "target dropped before delivery");
                }
                Delivery::fetched(url, image.clone())
            }
            Err(e) if e.is_cancelled() => Delivery::cancelled(url),
            Err(e) => Delivery::failed(url, e.to_string()),
        }
    }

    /// Encode and write on the blocking pool; the handle is kept so hosts can
    /// wait for it with [`Orchestrator::flush_persistence`].
    fn save_to_persistence(&mut self, url: &str, image: &crate::decoded::Image) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let persistence = Arc::clone(persistence);
        let url = url.to_string();
        let image = image.clone();
        let saving = self.runtime.spawn_blocking(move || {
            if let Err(e) = persistence.save(&url, &image) {
                tracing::warn!(url = %url, "disk cache save failed: {:#}", e);
            }
        });
        self.saves.push(saving);
    }
}
