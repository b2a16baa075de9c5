//! Display targets and their stable identity.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::decoded::Image;

/// Where a resolved image is displayed. The core only ever writes to a target.
pub trait ImageTarget: Send + Sync {
    fn bind(&self, url: &str, image: &Image);
}

/// Identity of a target widget, used for supersession and cancel-by-target.
/// Derived from the widget's allocation, so every handle to one `Arc` agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Handle to a display target. Handles built from the same `Arc` (and their
/// clones) share one [`TargetId`]. The target itself is held weakly so a
/// widget that has been dropped is treated as missing.
#[derive(Clone)]
pub struct TargetHandle {
    id: TargetId,
    sink: Weak<dyn ImageTarget>,
}

impl TargetHandle {
    pub fn new<T: ImageTarget + 'static>(target: &Arc<T>) -> Self {
        let weak: Weak<T> = Arc::downgrade(target);
        Self::from_weak(weak)
    }

    pub fn from_dyn(target: &Arc<dyn ImageTarget>) -> Self {
        Self::from_weak(Arc::downgrade(target))
    }

    fn from_weak(sink: Weak<dyn ImageTarget>) -> Self {
        // Thin data pointer; vtable metadata differs between `new` and `from_dyn`.
        let id = TargetId(Weak::as_ptr(&sink) as *const () as usize as u64);
        Self { id, sink }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    /// False once the underlying target has been dropped.
    pub fn is_alive(&self) -> bool {
        self.sink.strong_count() > 0
    }

    /// Bind `image` to the target. Returns false if the target is gone.
    pub fn bind(&self, url: &str, image: &Image) -> bool {
        match self.sink.upgrade() {
            Some(target) => {
                target.bind(url, image);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
