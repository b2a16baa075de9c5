//! Optional disk persistence behind the in-memory cache store.
//!
//! The orchestrator consults a [`Persistence`] backend when memory has no
//! image for a URL and the request policy allows cached results, and saves
//! every successfully fetched image back to it. Loads run on the caller's
//! thread inside `request`; saves run on tokio's blocking pool.

mod disk;

use anyhow::Result;
use std::time::SystemTime;

use crate::decoded::Image;

pub use disk::{file_name_for_url, DiskPersistence};

/// Storage for decoded images keyed by URL.
pub trait Persistence: Send + Sync {
    /// Load a stored image and the time it was stored, if present.
    fn load(&self, url: &str) -> Result<Option<(Image, SystemTime)>>;
    /// Store `image` for `url`, replacing any previous copy.
    fn save(&self, url: &str, image: &Image) -> Result<()>;
    /// Remove the stored copy. Returns true if one existed.
    fn remove(&self, url: &str) -> Result<bool>;
}
