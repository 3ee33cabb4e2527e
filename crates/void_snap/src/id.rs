//! Snap feature identity
//!
//! Every generated point or segment carries a [`FeatureId`] that stays fixed
//! for the lifetime of that feature and is never handed out again, so the
//! stability state machine can tell "the same target" apart from "a target at
//! the same place".

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Unique identity of a generated snap feature
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(u64);

impl FeatureId {
    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe, monotonic feature id allocator
///
/// `0` is reserved and never allocated.
pub struct FeatureIdAllocator {
    next: AtomicU64,
}

impl FeatureIdAllocator {
    /// Fresh allocator whose first id is `1`
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Isolated allocator seeded at `first`, for deterministic tests
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.max(1)),
        }
    }

    /// The process-wide allocator
    pub fn shared() -> Arc<FeatureIdAllocator> {
        static SHARED: OnceLock<Arc<FeatureIdAllocator>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(FeatureIdAllocator::new())).clone()
    }

    /// Allocate the next id
    pub fn allocate(&self) -> FeatureId {
        FeatureId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Id the next call to [`allocate`](Self::allocate) would return
    pub fn peek(&self) -> FeatureId {
        FeatureId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for FeatureIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FeatureIdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureIdAllocator")
            .field("next", &self.next.load(Ordering::Relaxed))
            .finish()
    }
}
