//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions are organized by year. Each one derives `AocSolver` and
//! `AutoRegisterSolver`, so linking this crate is enough for
//! `SolverRegistryBuilder::register_all_plugins` to find it.
//!
//! [`utils`] holds the helpers shared between days: line/integer parsing
//! and a memoizing cache for recursive lookups.

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
