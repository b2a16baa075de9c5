/// Counters for monitoring cache and coalescing effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    /// Requests received, including rejected ones.
    pub requests: u64,
    /// Requests rejected as invalid input.
    pub rejected: u64,
    /// Requests served synchronously from cache.
    pub cache_hits: u64,
    /// Images restored from the persistence backend into memory.
    pub disk_restores: u64,
    /// Requests that joined an already running fetch.
    pub coalesced: u64,
    /// Queued requests removed because a newer request took their target.
    pub superseded: u64,
    pub fetches_started: u64,
    pub fetches_succeeded: u64,
    pub fetches_failed: u64,
    /// Requests resolved with a `Cancelled` delivery.
    pub deliveries_cancelled: u64,
}

impl OrchestratorStats {
    /// Share of network-bound requests that piggybacked on an existing fetch (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        let network_bound = self.coalesced + self.fetches_started;
        if network_bound == 0 {
            0.0
        } else {
            self.coalesced as f64 / network_bound as f64
        }
    }
}
