//! In-memory map of URL -> cache entry.

use std::collections::HashMap;
use std::time::SystemTime;

use crate::decoded::Image;

use super::entry::{CacheEntry, DEFAULT_COOL_TIME_MINUTES};

/// Process-local cache of decoded images keyed by URL.
///
/// Owned by the orchestrator; all mutation goes through it.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    default_cool_time_minutes: u32,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_COOL_TIME_MINUTES)
    }
}

impl CacheStore {
    /// Create an empty store; new entries start with `default_cool_time_minutes`.
    pub fn new(default_cool_time_minutes: u32) -> Self {
        Self {
            entries: HashMap::new(),
            default_cool_time_minutes,
        }
    }

    pub fn get(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    /// Cached image for `url`, if any.
    pub fn image(&self, url: &str) -> Option<&Image> {
        self.entries.get(url).and_then(CacheEntry::image)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn entry_mut(&mut self, url: &str) -> &mut CacheEntry {
        let default = self.default_cool_time_minutes;
        self.entries
            .entry(url.to_string())
            .or_insert_with(|| CacheEntry::new(url.to_string(), default))
    }

    /// Create an empty entry for `url` if none exists.
    pub fn ensure(&mut self, url: &str) -> &CacheEntry {
        self.entry_mut(url)
    }

    /// Store `image` as the latest fetch for `url`, stamped now.
    pub fn upsert(&mut self, url: &str, image: Image) {
        self.upsert_at(url, image, SystemTime::now());
    }

    /// Like `upsert` with an explicit fetch time (e.g. a restored file's mtime).
    pub fn upsert_at(&mut self, url: &str, image: Image, at: SystemTime) {
        self.entry_mut(url).set_image(image, at);
    }

    /// Remove the entry for `url`. Returns true if one existed.
    pub fn remove(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Remove every entry. Returns how many were dropped.
    pub fn remove_all(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    /// Change the cool time of an existing entry. No-op (returns false) if absent.
    pub fn set_cool_time(&mut self, url: &str, minutes: u32) -> bool {
        match self.entries.get_mut(url) {
            Some(entry) => {
                entry.set_cool_time(minutes);
                true
            }
            None => false,
        }
    }
}
