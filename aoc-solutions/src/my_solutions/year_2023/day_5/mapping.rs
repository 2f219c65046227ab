//! Range translations and the stages built from them.

use super::range::{Range, RangeError, Value};
use thiserror::Error;

/// Translates `source` onto the equally long `destination` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMapping {
    source: Range,
    destination: Range,
}

impl RangeMapping {
    /// From an almanac line `<dst-start> <src-start> <length>`.
    pub fn new(destination_start: Value, source_start: Value, len: Value) -> Result<Self, RangeError> {
        Ok(Self {
            source: Range::from_start_len(source_start, len)?,
            destination: Range::from_start_len(destination_start, len)?,
        })
    }

    pub fn source(&self) -> Range {
        self.source
    }

    pub fn destination(&self) -> Range {
        self.destination
    }

    /// Values outside the source range pass through unchanged.
    pub fn translate_forward(&self, v: Value) -> Value {
        shift(&self.source, &self.destination, v)
    }

    /// Values outside the destination range pass through unchanged.
    pub fn translate_backward(&self, v: Value) -> Value {
        shift(&self.destination, &self.source, v)
    }
}

fn shift(from: &Range, to: &Range, v: Value) -> Value {
    if !from.contains(v) {
        return v;
    }
    to.start() + (v - from.start())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("{side} ranges {first} and {second} overlap")]
    Overlap {
        side: &'static str,
        first: Range,
        second: Range,
    },
    #[error("destination values {0} are also passed through unchanged, so they have two preimages")]
    NotInvertible(Range),
}

/// All translations from one category to the next.
///
/// Source ranges are pairwise disjoint, and so are destination ranges, so
/// forward resolution is unambiguous. Backward resolution is only well defined
/// when the destination ranges cover exactly the source ranges; otherwise a
/// destination value outside every source is reached twice (once translated,
/// once passed through) and [`Stage::check_invertible`] reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    source: String,
    destination: String,
    mappings: Vec<RangeMapping>,
    ambiguous: Option<Range>,
}

impl Stage {
    /// Mappings keep their input order.
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        mappings: Vec<RangeMapping>,
    ) -> Result<Self, StageError> {
        let sources = sorted_disjoint("source", mappings.iter().map(RangeMapping::source))?;
        let destinations =
            sorted_disjoint("destination", mappings.iter().map(RangeMapping::destination))?;
        let ambiguous = destinations.iter().find_map(|&d| first_gap(&sources, d));
        Ok(Self {
            source: source.into(),
            destination: destination.into(),
            mappings,
            ambiguous,
        })
    }

    /// Category this stage translates from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Category this stage translates to.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn mappings(&self) -> &[RangeMapping] {
        &self.mappings
    }

    /// `Ok` when every value has exactly one preimage, so that
    /// `resolve_backward(resolve_forward(v)) == v` holds for all `v`.
    pub fn check_invertible(&self) -> Result<(), StageError> {
        match self.ambiguous {
            Some(range) => Err(StageError::NotInvertible(range)),
            None => Ok(()),
        }
    }

    /// The first mapping that moves `v` decides; otherwise `v` is unchanged.
    pub fn resolve_forward(&self, v: Value) -> Value {
        self.mappings
            .iter()
            .map(|m| m.translate_forward(v))
            .find(|&t| t != v)
            .unwrap_or(v)
    }

    pub fn resolve_backward(&self, v: Value) -> Value {
        self.mappings
            .iter()
            .map(|m| m.translate_backward(v))
            .find(|&t| t != v)
            .unwrap_or(v)
    }
}

fn sorted_disjoint(
    side: &'static str,
    ranges: impl Iterator<Item = Range>,
) -> Result<Vec<Range>, StageError> {
    let mut sorted: Vec<Range> = ranges.collect();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0].intersect(&pair[1]).is_ok() {
            return Err(StageError::Overlap {
                side,
                first: pair[0],
                second: pair[1],
            });
        }
    }
    Ok(sorted)
}

/// Lowest part of `target` outside the sorted, disjoint `covering` ranges.
fn first_gap(covering: &[Range], target: Range) -> Option<Range> {
    let mut cursor = target.start();
    for r in covering {
        if r.end() < cursor {
            continue;
        }
        if r.start() > target.end() {
            break;
        }
        if r.start() > cursor {
            return Range::new(cursor, r.start() - 1).ok();
        }
        match r.end().checked_add(1) {
            Some(next) if next <= target.end() => cursor = next,
            _ => return None,
        }
    }
    Range::new(cursor, target.end()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seed_to_soil() -> Stage {
        Stage::new(
            "seed",
            "soil",
            vec![
                RangeMapping::new(50, 98, 2).unwrap(),
                RangeMapping::new(52, 50, 48).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_translate_forward() {
        let m = RangeMapping::new(50, 98, 2).unwrap();
        assert_eq!(m.source(), Range::new(98, 99).unwrap());
        assert_eq!(m.destination(), Range::new(50, 51).unwrap());
        assert_eq!(m.translate_forward(98), 50);
        assert_eq!(m.translate_forward(99), 51);
        assert_eq!(m.translate_forward(97), 97);
        assert_eq!(m.translate_forward(100), 100);
    }

    #[test]
    fn test_translate_backward() {
        let m = RangeMapping::new(50, 98, 2).unwrap();
        assert_eq!(m.translate_backward(50), 98);
        assert_eq!(m.translate_backward(51), 99);
        assert_eq!(m.translate_backward(52), 52);
    }

    #[test]
    fn test_zero_length_mapping_rejected() {
        assert_eq!(RangeMapping::new(50, 98, 0), Err(RangeError::Empty(0)));
    }

    #[test]
    fn test_stage_resolution() {
        let stage = seed_to_soil();
        assert_eq!(stage.resolve_forward(79), 81);
        assert_eq!(stage.resolve_forward(14), 14);
        assert_eq!(stage.resolve_forward(55), 57);
        assert_eq!(stage.resolve_forward(13), 13);
        assert_eq!(stage.resolve_forward(98), 50);
        assert_eq!(stage.resolve_backward(81), 79);
        assert_eq!(stage.resolve_backward(50), 98);
        assert_eq!(stage.resolve_backward(10), 10);
    }

    #[test]
    fn test_empty_stage_is_identity() {
        let stage = Stage::new("soil", "location", vec![]).unwrap();
        assert_eq!(stage.resolve_forward(42), 42);
        assert_eq!(stage.resolve_backward(42), 42);
    }

    #[test]
    fn test_overlapping_sources_rejected() {
        let result = Stage::new(
            "a",
            "b",
            vec![
                RangeMapping::new(0, 10, 5).unwrap(),
                RangeMapping::new(100, 14, 3).unwrap(),
            ],
        );
        assert!(matches!(
            result,
            Err(StageError::Overlap { side: "source", .. })
        ));
    }

    #[test]
    fn test_overlapping_destinations_rejected() {
        let result = Stage::new(
            "a",
            "b",
            vec![
                RangeMapping::new(0, 10, 5).unwrap(),
                RangeMapping::new(4, 50, 3).unwrap(),
            ],
        );
        assert!(matches!(
            result,
            Err(StageError::Overlap { side: "destination", .. })
        ));
    }

    #[test]
    fn test_adjacent_ranges_allowed() {
        let stage = Stage::new(
            "a",
            "b",
            vec![
                RangeMapping::new(15, 10, 5).unwrap(),
                RangeMapping::new(10, 15, 5).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(stage.check_invertible(), Ok(()));
        assert_eq!(stage.resolve_forward(12), 17);
        assert_eq!(stage.resolve_backward(17), 12);
    }

    #[test]
    fn test_seed_to_soil_is_invertible() {
        assert_eq!(seed_to_soil().check_invertible(), Ok(()));
        assert_eq!(Stage::new("a", "b", vec![]).unwrap().check_invertible(), Ok(()));
    }

    #[test]
    fn test_destination_outside_sources_is_ambiguous() {
        // 98 -> 10, but 10 itself also passes through as 10
        let stage = Stage::new("seed", "location", vec![RangeMapping::new(10, 98, 2).unwrap()]).unwrap();
        assert_eq!(
            stage.check_invertible(),
            Err(StageError::NotInvertible(Range::new(10, 11).unwrap()))
        );
        assert_eq!(stage.resolve_forward(10), 10);
        assert_eq!(stage.resolve_backward(10), 98);
    }

    #[test]
    fn test_partially_covered_destination_reports_the_gap() {
        // sources [0, 9] and [20, 24]; destinations [5, 14] and [0, 4]
        let stage = Stage::new(
            "a",
            "b",
            vec![
                RangeMapping::new(5, 0, 10).unwrap(),
                RangeMapping::new(0, 20, 5).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(
            stage.check_invertible(),
            Err(StageError::NotInvertible(Range::new(10, 14).unwrap()))
        );
    }

    #[test]
    fn test_first_gap() {
        let covering = [Range::new(0, 4).unwrap(), Range::new(5, 9).unwrap(), Range::new(20, 29).unwrap()];
        assert_eq!(first_gap(&covering, Range::new(2, 9).unwrap()), None);
        assert_eq!(first_gap(&covering, Range::new(8, 25).unwrap()), Range::new(10, 19).ok());
        assert_eq!(first_gap(&covering, Range::new(25, 40).unwrap()), Range::new(30, 40).ok());
        assert_eq!(first_gap(&[], Range::new(1, 2).unwrap()), Range::new(1, 2).ok());
        assert_eq!(
            first_gap(&[Range::new(0, Value::MAX).unwrap()], Range::new(5, Value::MAX).unwrap()),
            None
        );
    }

    /// Sources laid out back to back from `base`, destinations in shuffled block order.
    fn permuted_blocks() -> impl Strategy<Value = (Value, Vec<RangeMapping>)> {
        (0i64..1_000, proptest::collection::vec(1i64..20, 1..6)).prop_flat_map(|(base, lens)| {
            let order: Vec<usize> = (0..lens.len()).collect();
            (Just(base), Just(lens), Just(order).prop_shuffle())
        })
        .prop_map(|(base, lens, order)| {
            let mut src_starts = Vec::with_capacity(lens.len());
            let mut next = base;
            for len in &lens {
                src_starts.push(next);
                next += len;
            }
            let mut dst_starts = vec![0; lens.len()];
            let mut next = base;
            for &i in &order {
                dst_starts[i] = next;
                next += lens[i];
            }
            let mappings = (0..lens.len())
                .map(|i| RangeMapping::new(dst_starts[i], src_starts[i], lens[i]).unwrap())
                .collect();
            (base, mappings)
        })
    }

    proptest! {
        #[test]
        fn prop_backward_inverts_forward_inside_source(
            dst in 0i64..1_000_000, src in 0i64..1_000_000, len in 1i64..10_000, offset in 0i64..10_000,
        ) {
            let m = RangeMapping::new(dst, src, len).unwrap();
            let v = src + offset % len;
            prop_assert_eq!(m.translate_backward(m.translate_forward(v)), v);
        }

        #[test]
        fn prop_identity_outside_source(
            dst in 0i64..1_000, src in 0i64..1_000, len in 1i64..100, v in -1_000i64..3_000,
        ) {
            let m = RangeMapping::new(dst, src, len).unwrap();
            prop_assume!(!m.source().contains(v));
            prop_assert_eq!(m.translate_forward(v), v);
        }

        #[test]
        fn prop_permuted_blocks_round_trip((base, mappings) in permuted_blocks(), offset in -10i64..110) {
            let stage = Stage::new("a", "b", mappings).unwrap();
            prop_assert_eq!(stage.check_invertible(), Ok(()));
            let v = base + offset;
            prop_assert_eq!(stage.resolve_backward(stage.resolve_forward(v)), v);
        }

        #[test]
        fn prop_round_trip_fails_only_when_not_invertible(
            dst in 0i64..50, src in 0i64..50, len in 1i64..20, v in -10i64..80,
        ) {
            let stage = Stage::new("a", "b", vec![RangeMapping::new(dst, src, len).unwrap()]).unwrap();
            if stage.resolve_backward(stage.resolve_forward(v)) != v {
                prop_assert!(stage.check_invertible().is_err());
            }
        }

        #[test]
        fn prop_stage_uses_the_containing_mapping(v in 0i64..200) {
            let stage = seed_to_soil();
            let expected = stage
                .mappings()
                .iter()
                .find(|m| m.source().contains(v))
                .map_or(v, |m| m.translate_forward(v));
            prop_assert_eq!(stage.resolve_forward(v), expected);
        }
    }
}
