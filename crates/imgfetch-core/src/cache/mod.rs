//! Cache store.
//!
//! One entry per URL holding the last successfully decoded image, the time it
//! was fetched and a per-entry cool time in minutes. Entries may exist without
//! an image (created when a fetch starts); image and timestamp are always set
//! together.

mod entry;
mod store;

pub use entry::{CacheEntry, DEFAULT_COOL_TIME_MINUTES};
pub use store::CacheStore;
