//! Single-threaded DP cache implementation.

use std::cell::RefCell;
use std::marker::PhantomData;

use super::backend::Backend;
use super::problem::DpProblem;

/// A dynamic programming cache with lazy evaluation and dependency resolution.
///
/// Dependencies are resolved recursively and each index is computed at most
/// once; later lookups are served from the backend.
///
/// # Type Parameters
///
/// - `I`: Index type (must implement `Clone`)
/// - `K`: Value type (must implement `Clone`)
/// - `B`: Backend storage type (must implement `Backend<I, K>`)
/// - `P`: Problem type (must implement `DpProblem<I, K>`)
///
/// # Warning: No Cycle Detection
///
/// A cyclic dependency graph overflows the stack.
/// **Users MUST ensure dependencies form a DAG.**
///
/// # Example
///
/// ```rust
/// use aoc_solutions::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
///
/// struct Fibonacci;
///
/// impl DpProblem<u32, u64> for Fibonacci {
///     fn deps(&self, n: &u32) -> Vec<u32> {
///         if *n <= 1 { vec![] } else { vec![n - 1, n - 2] }
///     }
///     fn compute(&self, n: &u32, deps: Vec<u64>) -> u64 {
///         if *n <= 1 { *n as u64 } else { deps[0] + deps[1] }
///     }
/// }
///
/// let cache = DpCache::with_problem(HashMapBackend::new(), Fibonacci);
/// assert_eq!(cache.get(&50), 12_586_269_025);
/// assert_eq!(cache.cached_len(), 51);
/// ```
pub struct DpCache<I, K, B, P>
where
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    backend: RefCell<B>,
    problem: P,
    _phantom: PhantomData<(I, K)>,
}

impl<I, K, B, P> DpCache<I, K, B, P>
where
    I: Clone,
    K: Clone,
    B: Backend<I, K>,
    P: DpProblem<I, K>,
{
    /// Creates a new DpCache with the given backend and problem definition.
    pub fn with_problem(backend: B, problem: P) -> Self {
        Self {
            backend: RefCell::new(backend),
            problem,
            _phantom: PhantomData,
        }
    }

    /// Retrieves the value for the given index, computing it if necessary.
    ///
    /// On a miss, every dependency is resolved (and cached) first, then the
    /// value is computed, stored and returned.
    pub fn get(&self, index: &I) -> K {
        if let Some(value) = self.backend.borrow().get(index) {
            return value.clone();
        }

        // Resolve dependencies with no borrow held; they re-enter `get`
        let deps = self.problem.deps(index);
        let dep_values: Vec<K> = deps.into_iter().map(|dep| self.get(&dep)).collect();

        self.backend
            .borrow_mut()
            .get_or_insert(index.clone(), || self.problem.compute(index, dep_values))
            .clone()
    }

    /// Returns the cached value without computing anything.
    pub fn peek(&self, index: &I) -> Option<K> {
        self.backend.borrow().get(index).cloned()
    }

    /// Number of values currently cached.
    pub fn cached_len(&self) -> usize {
        self.backend.borrow().len()
    }

    /// Runs `f` against the backend, e.g. to inspect per-stage statistics.
    pub fn with_backend<R>(&self, f: impl FnOnce(&B) -> R) -> R {
        f(&self.backend.borrow())
    }
}
