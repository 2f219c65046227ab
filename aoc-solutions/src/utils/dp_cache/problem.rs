//! Trait-based DP problem definition.

/// Defines the dependency structure and computation of a DP problem.
///
/// # Type Parameters
///
/// - `I`: Index type for the DP cache
/// - `K`: Value type stored in the cache
///
/// # Example
///
/// ```rust
/// use aoc_solutions::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
///
/// struct Factorial;
///
/// impl DpProblem<u64, u64> for Factorial {
///     fn deps(&self, n: &u64) -> Vec<u64> {
///         if *n == 0 { vec![] } else { vec![n - 1] }
///     }
///
///     fn compute(&self, n: &u64, deps: Vec<u64>) -> u64 {
///         if *n == 0 { 1 } else { n * deps[0] }
///     }
/// }
///
/// let cache = DpCache::with_problem(HashMapBackend::new(), Factorial);
/// assert_eq!(cache.get(&5), 120);
/// ```
pub trait DpProblem<I, K> {
    /// Returns the indices that this index depends on.
    ///
    /// For base cases, return an empty vector.
    fn deps(&self, index: &I) -> Vec<I>;

    /// Computes the value for `index` from the resolved dependency values,
    /// given in the same order as `deps()` returned them.
    fn compute(&self, index: &I, deps: Vec<K>) -> K;
}
