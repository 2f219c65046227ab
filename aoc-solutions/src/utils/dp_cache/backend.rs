//! Storage backends for the DP cache.

use std::collections::HashMap;
use std::hash::Hash;

/// A storage backend for the DP cache.
///
/// Entries are only ever added; a stored value is never replaced or evicted.
pub trait Backend<I, K> {
    /// Returns the cached value for `index`, if any.
    fn get(&self, index: &I) -> Option<&K>;

    /// Returns the cached value for `index`, storing `compute()` first if absent.
    ///
    /// `compute` is not called when the value is already present.
    fn get_or_insert<F: FnOnce() -> K>(&mut self, index: I, compute: F) -> &K;

    /// Number of cached values.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A HashMap-based backend for arbitrary hashable indices.
#[derive(Debug)]
pub struct HashMapBackend<I, K> {
    data: HashMap<I, K>,
}

impl<I, K> HashMapBackend<I, K> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<I, K> Default for HashMapBackend<I, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Hash + Eq, K> Backend<I, K> for HashMapBackend<I, K> {
    fn get(&self, index: &I) -> Option<&K> {
        self.data.get(index)
    }

    fn get_or_insert<F: FnOnce() -> K>(&mut self, index: I, compute: F) -> &K {
        self.data.entry(index).or_insert_with(compute)
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

/// One [`HashMapBackend`] per stage, indexed by `(stage, value)`.
///
/// Suited to lookups that walk a fixed sequence of stages, where each stage
/// keeps its own table of already-resolved values.
#[derive(Debug)]
pub struct StagedBackend<V, K> {
    stages: Vec<HashMapBackend<V, K>>,
}

impl<V, K> StagedBackend<V, K> {
    /// Creates empty tables for `stage_count` stages.
    pub fn new(stage_count: usize) -> Self {
        Self {
            stages: (0..stage_count).map(|_| HashMapBackend::new()).collect(),
        }
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl<V: Hash + Eq, K> StagedBackend<V, K> {
    /// Number of values cached for `stage` (0 for unknown stages).
    pub fn stage_len(&self, stage: usize) -> usize {
        self.stages.get(stage).map_or(0, |s| s.data.len())
    }
}

impl<V: Hash + Eq, K> Backend<(usize, V), K> for StagedBackend<V, K> {
    fn get(&self, (stage, value): &(usize, V)) -> Option<&K> {
        self.stages.get(*stage)?.get(value)
    }

    /// # Panics
    ///
    /// Panics if `stage >= stage_count()`.
    fn get_or_insert<F: FnOnce() -> K>(&mut self, (stage, value): (usize, V), compute: F) -> &K {
        self.stages[stage].get_or_insert(value, compute)
    }

    fn len(&self) -> usize {
        self.stages.iter().map(|s| s.data.len()).sum()
    }
}
