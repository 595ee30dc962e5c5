//! Published traversability grids.
//!
//! Readers take an `Arc` to the current snapshot and query it without holding
//! any lock; publishing swaps the `Arc`. A reader therefore sees either the old
//! or the new grid in full, never a mix.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::grid::LayeredGrid;

/// Immutable result of one computation cycle.
#[derive(Debug)]
pub struct TraversabilitySnapshot {
    /// Monotonically increasing per store, starting at 1.
    pub generation: u64,
    pub grid: LayeredGrid,
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<TraversabilitySnapshot>>>,
    generation: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published snapshot, if any.
    pub fn current(&self) -> Option<Arc<TraversabilitySnapshot>> {
        self.current.read().clone()
    }

    /// Generation of the latest snapshot, 0 before the first publish.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the current snapshot and return it.
    pub fn publish(&self, grid: LayeredGrid) -> Arc<TraversabilitySnapshot> {
        let mut current = self.current.write();
        let generation = self.generation.load(Ordering::Relaxed) + 1;
        let snapshot = Arc::new(TraversabilitySnapshot { generation, grid });
        *current = Some(Arc::clone(&snapshot));
        self.generation.store(generation, Ordering::Release);
        snapshot
    }
}
