//! Closed integer ranges and unions of them.

use std::fmt;
use thiserror::Error;

/// Almanac numbers reach 10 digits, so everything is carried as `i64`.
pub type Value = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range start {start} is after its end {end}")]
    Inverted { start: Value, end: Value },
    #[error("range length must be positive, got {0}")]
    Empty(Value),
    #[error("range starting at {start} with length {len} overflows")]
    Overflow { start: Value, len: Value },
    /// The two ranges share no value; callers usually treat this as "not applicable"
    #[error("ranges do not intersect")]
    NoIntersection,
}

/// Closed interval `[start, end]`, always with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    start: Value,
    end: Value,
}

impl Range {
    pub fn new(start: Value, end: Value) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// `len` values starting at `start`, as written in the almanac.
    pub fn from_start_len(start: Value, len: Value) -> Result<Self, RangeError> {
        if len <= 0 {
            return Err(RangeError::Empty(len));
        }
        let end = start
            .checked_add(len - 1)
            .ok_or(RangeError::Overflow { start, len })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Value {
        self.start
    }

    pub fn end(&self) -> Value {
        self.end
    }

    /// Number of values covered; `None` when that count does not fit in a [`Value`].
    pub fn len(&self) -> Option<Value> {
        self.end.checked_sub(self.start)?.checked_add(1)
    }

    pub fn contains(&self, v: Value) -> bool {
        self.start <= v && v <= self.end
    }

    /// Values present in both ranges.
    pub fn intersect(&self, other: &Range) -> Result<Range, RangeError> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start > end {
            return Err(RangeError::NoIntersection);
        }
        Ok(Range { start, end })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Union of disjoint ranges, queried for membership only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiRange {
    ranges: Vec<Range>,
}

impl MultiRange {
    /// Builds the union from `(start, length)` pairs.
    pub fn from_start_len_pairs(values: &[Value]) -> Result<Self, MultiRangeError> {
        if values.len() % 2 != 0 {
            return Err(MultiRangeError::UnpairedValue(values.len()));
        }
        let ranges = values
            .chunks_exact(2)
            .map(|pair| Range::from_start_len(pair[0], pair[1]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ranges.into_iter().collect())
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Linear membership test.
    pub fn contains(&self, v: Value) -> bool {
        self.ranges.iter().any(|r| r.contains(v))
    }
}

impl FromIterator<Range> for MultiRange {
    fn from_iter<T: IntoIterator<Item = Range>>(iter: T) -> Self {
        let mut ranges: Vec<Range> = iter.into_iter().collect();
        ranges.sort_unstable();
        Self { ranges }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiRangeError {
    #[error("expected (start, length) pairs, got {0} values")]
    UnpairedValue(usize),
    #[error(transparent)]
    Range(#[from] RangeError),
}
