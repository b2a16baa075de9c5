//! Per-URL cache entry.

use std::time::{Duration, SystemTime};

use crate::decoded::Image;

/// Cool time given to entries when the store was built without an explicit default.
pub const DEFAULT_COOL_TIME_MINUTES: u32 = 5;

/// Last successfully decoded image for one URL, plus its refresh policy.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    url: String,
    // `image` and `last_fetched_at` are only ever written together in `set_image`.
    image: Option<Image>,
    last_fetched_at: Option<SystemTime>,
    cool_time_minutes: u32,
}

impl CacheEntry {
    pub(super) fn new(url: String, cool_time_minutes: u32) -> Self {
        Self {
            url,
            image: None,
            last_fetched_at: None,
            cool_time_minutes,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn last_fetched_at(&self) -> Option<SystemTime> {
        self.last_fetched_at
    }

    pub fn cool_time_minutes(&self) -> u32 {
        self.cool_time_minutes
    }

    pub fn cool_time(&self) -> Duration {
        Duration::from_secs(u64::from(self.cool_time_minutes) * 60)
    }

    pub(super) fn set_image(&mut self, image: Image, at: SystemTime) {
        self.image = Some(image);
        self.last_fetched_at = Some(at);
    }

    pub(super) fn set_cool_time(&mut self, minutes: u32) {
        self.cool_time_minutes = minutes;
    }

    /// Age of the cached image at `now`. A timestamp in the future counts as zero.
    pub fn age(&self, now: SystemTime) -> Option<Duration> {
        self.last_fetched_at
            .map(|at| now.duration_since(at).unwrap_or(Duration::ZERO))
    }

    /// True if an image is cached and it is strictly younger than the cool time.
    pub fn is_within_cool_time(&self, now: SystemTime) -> bool {
        match (&self.image, self.age(now)) {
            (Some(_), Some(age)) => age < self.cool_time(),
            _ => false,
        }
    }
}
