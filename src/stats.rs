//! Optional instrumentation of index queries.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for point accesses and distance computations.
///
/// Counting is decided once, when the index is built. Disabled counters cost a branch per
/// access. Enabled counters use relaxed atomics, so an index can be queried from several threads
/// at once.
#[derive(Debug, Default)]
pub struct Statistics {
    enabled: bool,
    object_accesses: AtomicU64,
    distance_computations: AtomicU64,
}

/// A point-in-time copy of [`Statistics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Number of times a point was read from the accessor.
    pub object_accesses: u64,
    /// Number of full distance computations.
    pub distance_computations: u64,
}

impl Statistics {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    /// Returns `true` if this index counts accesses.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub(crate) fn count_object_access(&self) {
        if self.enabled {
            self.object_accesses.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn count_distance_computation(&self) {
        if self.enabled {
            self.distance_computations.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Read the current counter values.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            object_accesses: self.object_accesses.load(Ordering::Relaxed),
            distance_computations: self.distance_computations.load(Ordering::Relaxed),
        }
    }

    /// Reset both counters to zero.
    pub fn reset(&self) {
        self.object_accesses.store(0, Ordering::Relaxed);
        self.distance_computations.store(0, Ordering::Relaxed);
    }

    /// Emit the counters through the `log` facade, prefixed with the name of the index.
    pub(crate) fn log(&self, prefix: &str) {
        if !self.is_enabled() {
            return;
        }
        let snapshot = self.snapshot();
        log::info!("{}.objaccess: {}", prefix, snapshot.object_accesses);
        log::info!("{}.distancecalcs: {}", prefix, snapshot.distance_computations);
    }
}
