//! Dynamic Programming Cache with Lazy Evaluation
//!
//! Memoization for recursive computations whose values depend on other
//! values in a directed acyclic graph (DAG). A problem describes, per index,
//! which indices it depends on and how to combine their values; [`DpCache`]
//! resolves the dependencies, computes each index once and keeps the result.
//!
//! # Backend Types
//!
//! - [`HashMapBackend`]: Supports arbitrary hashable index types
//! - [`StagedBackend`]: One hash table per stage, indexed by `(stage, value)`
//!
//! # Warning: Cycle Behavior
//!
//! **These caches do NOT support cycle detection.** A cycle in the
//! dependency graph overflows the stack.
//!
//! # Example: Walking a Fixed Sequence of Stages
//!
//! ```rust
//! use aoc_solutions::utils::dp_cache::{DpCache, DpProblem, StagedBackend};
//!
//! /// Each stage adds its offset; the value at the last stage is the result.
//! struct Offsets(Vec<i64>);
//!
//! impl DpProblem<(usize, i64), i64> for Offsets {
//!     fn deps(&self, &(stage, v): &(usize, i64)) -> Vec<(usize, i64)> {
//!         if stage + 1 < self.0.len() { vec![(stage + 1, v + self.0[stage])] } else { vec![] }
//!     }
//!     fn compute(&self, &(stage, v): &(usize, i64), deps: Vec<i64>) -> i64 {
//!         deps.first().copied().unwrap_or(v + self.0[stage])
//!     }
//! }
//!
//! let cache = DpCache::with_problem(StagedBackend::new(3), Offsets(vec![1, 10, 100]));
//! assert_eq!(cache.get(&(0, 0)), 111);
//! assert_eq!(cache.with_backend(|b| b.stage_len(2)), 1);
//! ```

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, HashMapBackend, StagedBackend};
pub use cache::DpCache;
pub use problem::DpProblem;
