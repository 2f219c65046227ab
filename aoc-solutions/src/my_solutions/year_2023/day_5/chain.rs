//! The full seed-to-location chain and its memoized resolver.

use super::mapping::{Stage, StageError};
use super::range::{MultiRange, Range, Value};
use crate::utils::dp_cache::{DpCache, DpProblem, StagedBackend};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("a chain needs at least one stage")]
    Empty,
    #[error("stage {index} starts at '{found}' but the previous stage ends at '{expected}'")]
    Disconnected {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("stage {index} does not exist (chain has {len} stages)")]
    StageOutOfRange { index: usize, len: usize },
    #[error("stage {index} cannot be resolved backwards: values {uncovered} have two preimages")]
    NotInvertible { index: usize, uncovered: Range },
}

/// Stages linked end to start, from the origin category to the terminal one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    pub fn new(stages: Vec<Stage>) -> Result<Self, ChainError> {
        if stages.is_empty() {
            return Err(ChainError::Empty);
        }
        for (index, pair) in stages.windows(2).enumerate() {
            if pair[0].destination() != pair[1].source() {
                return Err(ChainError::Disconnected {
                    index: index + 1,
                    expected: pair[0].destination().to_string(),
                    found: pair[1].source().to_string(),
                });
            }
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Index of the last stage.
    pub fn last_index(&self) -> usize {
        self.stages.len() - 1
    }

    pub fn origin(&self) -> &str {
        self.stages[0].source()
    }

    pub fn terminal(&self) -> &str {
        self.stages[self.last_index()].destination()
    }

    fn check_index(&self, index: usize) -> Result<(), ChainError> {
        if index < self.stages.len() {
            Ok(())
        } else {
            Err(ChainError::StageOutOfRange {
                index,
                len: self.stages.len(),
            })
        }
    }

    /// `Ok` when every stage up to and including `last` maps values one to one.
    pub fn check_invertible(&self, last: usize) -> Result<(), ChainError> {
        self.check_index(last)?;
        for (index, stage) in self.stages[..=last].iter().enumerate() {
            if let Err(StageError::NotInvertible(uncovered)) = stage.check_invertible() {
                return Err(ChainError::NotInvertible { index, uncovered });
            }
        }
        Ok(())
    }
}

/// Resolves `(stage, value)` through the rest of the chain towards the terminal.
struct TowardsTerminal<'c> {
    chain: &'c Chain,
}

impl DpProblem<(usize, Value), Value> for TowardsTerminal<'_> {
    fn deps(&self, &(stage, v): &(usize, Value)) -> Vec<(usize, Value)> {
        if stage < self.chain.last_index() {
            vec![(stage + 1, self.chain.stages[stage].resolve_forward(v))]
        } else {
            vec![]
        }
    }

    fn compute(&self, &(stage, v): &(usize, Value), deps: Vec<Value>) -> Value {
        deps.first()
            .copied()
            .unwrap_or_else(|| self.chain.stages[stage].resolve_forward(v))
    }
}

/// Resolves `(stage, value)` back through the earlier stages to the origin.
struct TowardsOrigin<'c> {
    chain: &'c Chain,
}

impl DpProblem<(usize, Value), Value> for TowardsOrigin<'_> {
    fn deps(&self, &(stage, v): &(usize, Value)) -> Vec<(usize, Value)> {
        if stage > 0 {
            vec![(stage - 1, self.chain.stages[stage].resolve_backward(v))]
        } else {
            vec![]
        }
    }

    fn compute(&self, &(stage, v): &(usize, Value), deps: Vec<Value>) -> Value {
        deps.first()
            .copied()
            .unwrap_or_else(|| self.chain.stages[stage].resolve_backward(v))
    }
}

/// Upper bound for [`ChainResolver::min_terminal_with_origin_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimit {
    /// Largest terminal value the scan will try (inclusive).
    pub max_terminal: Value,
}

impl SearchLimit {
    pub const fn up_to(max_terminal: Value) -> Self {
        Self { max_terminal }
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self::up_to(99_999_999_999)
    }
}

type Memo<P> = DpCache<(usize, Value), Value, StagedBackend<Value, Value>, P>;

/// Memoized lookups through a [`Chain`] in either direction.
///
/// Holds one forward and one backward table per stage. The tables only grow
/// and live as long as the resolver, so create one resolver per run.
pub struct ChainResolver<'c> {
    chain: &'c Chain,
    forward: Memo<TowardsTerminal<'c>>,
    backward: Memo<TowardsOrigin<'c>>,
}

impl<'c> ChainResolver<'c> {
    pub fn new(chain: &'c Chain) -> Self {
        Self {
            chain,
            forward: DpCache::with_problem(
                StagedBackend::new(chain.len()),
                TowardsTerminal { chain },
            ),
            backward: DpCache::with_problem(
                StagedBackend::new(chain.len()),
                TowardsOrigin { chain },
            ),
        }
    }

    pub fn chain(&self) -> &'c Chain {
        self.chain
    }

    /// Resolve `v`, a value of stage `origin_stage`'s source category, to the
    /// terminal category.
    pub fn resolve_to_terminal(&self, v: Value, origin_stage: usize) -> Result<Value, ChainError> {
        self.chain.check_index(origin_stage)?;
        Ok(self.forward.get(&(origin_stage, v)))
    }

    /// Resolve `v`, a value of stage `terminal_stage`'s destination category,
    /// back to the origin category.
    ///
    /// Fails with [`ChainError::NotInvertible`] if any stage on the way has a
    /// value with two preimages, since the result would depend on mapping order.
    pub fn resolve_to_origin(&self, v: Value, terminal_stage: usize) -> Result<Value, ChainError> {
        self.chain.check_invertible(terminal_stage)?;
        Ok(self.backward.get(&(terminal_stage, v)))
    }

    /// Smallest terminal value in `0..=limit.max_terminal` whose origin falls
    /// inside `admissible`.
    ///
    /// Tries every terminal value in turn, so the running time is linear in
    /// the answer. `Ok(None)` when the limit is reached without a match.
    ///
    /// # Memory
    ///
    /// Every terminal value tried is memoized at every stage, so the backward
    /// tables grow by up to `chain.len()` entries per value scanned. A scan
    /// that reaches an answer near `N` holds on the order of `N * chain.len()`
    /// entries until the resolver is dropped.
    pub fn min_terminal_with_origin_in(
        &self,
        admissible: &MultiRange,
        limit: SearchLimit,
    ) -> Result<Option<Value>, ChainError> {
        let last = self.chain.last_index();
        self.chain.check_invertible(last)?;
        if admissible.is_empty() {
            return Ok(None);
        }
        let found = (0..=limit.max_terminal)
            .find(|&terminal| admissible.contains(self.backward.get(&(last, terminal))));
        tracing::debug!(
            ?found,
            cached = self.backward.cached_len(),
            max_terminal = limit.max_terminal,
            "backward scan finished"
        );
        Ok(found)
    }

    /// Number of memoized values per stage, forward tables first.
    pub fn memo_sizes(&self) -> (Vec<usize>, Vec<usize>) {
        let sizes = |backend: &StagedBackend<Value, Value>| -> Vec<usize> {
            (0..backend.stage_count())
                .map(|stage| backend.stage_len(stage))
                .collect()
        };
        (
            self.forward.with_backend(sizes),
            self.backward.with_backend(sizes),
        )
    }
}
