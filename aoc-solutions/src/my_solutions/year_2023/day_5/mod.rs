//! 2023 day 5: If You Give A Seed A Fertilizer
//!
//! The almanac is a chain of stages (seed -> soil -> ... -> location), each a
//! set of disjoint range translations with identity for everything else.
//! A map whose destinations reach values its sources do not cover would give
//! those values two preimages, so the parser rejects it.
//! Part 1 pushes each seed forward to its location. Part 2 reads the seeds as
//! `(start, length)` ranges and walks locations upwards from 0, resolving each
//! back to a seed until one lands inside a seed range.

mod chain;
mod mapping;
mod range;

pub use chain::{Chain, ChainError, ChainResolver, SearchLimit};
pub use mapping::{RangeMapping, Stage, StageError};
pub use range::{MultiRange, MultiRangeError, Range, RangeError, Value};

use crate::utils::text::{blank_line_groups, parse_ints, split_label};
use anyhow::{Context, anyhow};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use std::num::ParseIntError;
use thiserror::Error;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 5, tags = ["2023", "ranges"])]
pub struct Solver;

/// Ways an almanac can be malformed. Any of them aborts parsing.
#[derive(Debug, Error)]
pub enum AlmanacError {
    #[error("expected '<label>: <values>'")]
    MissingQueryLine,
    #[error("unexpected line '{0}' after the query values")]
    TrailingQueryLine(String),
    #[error("expected '<source>-to-<destination> map:', got '{0}'")]
    BadHeader(String),
    #[error("expected 3 integers, found {0}")]
    FieldCount(usize),
    #[error("invalid integer: {0}")]
    Integer(#[from] ParseIntError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Parsed puzzle input: the query values and the chain they run through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Almanac {
    label: String,
    values: Vec<Value>,
    chain: Chain,
}

impl Almanac {
    /// Label of the query line, e.g. "seeds".
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Almanac;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let almanac = parse_almanac(input).map_err(|e| ParseError::InvalidFormat(format!("{:#}", e)))?;
        tracing::debug!(
            values = almanac.values.len(),
            stages = almanac.chain.len(),
            origin = almanac.chain.origin(),
            terminal = almanac.chain.terminal(),
            "parsed almanac"
        );
        Ok(almanac)
    }
}

fn parse_almanac(input: &str) -> anyhow::Result<Almanac> {
    let groups = blank_line_groups(input);
    let mut groups = groups.iter();

    let query = groups.next().ok_or_else(|| anyhow!("empty almanac"))?;
    let (line_no, first) = query[0];
    let (label, values) = parse_query_line(first).with_context(|| format!("line {}", line_no))?;
    if let Some(&(line_no, extra)) = query.get(1) {
        return Err(AlmanacError::TrailingQueryLine(extra.to_string()))
            .with_context(|| format!("line {}", line_no));
    }

    let stages = groups.map(|group| parse_stage(group)).collect::<anyhow::Result<Vec<_>>>()?;
    let chain = Chain::new(stages)?;

    Ok(Almanac {
        label: label.to_string(),
        values,
        chain,
    })
}

fn parse_query_line(line: &str) -> Result<(&str, Vec<Value>), AlmanacError> {
    let (label, rest) = split_label(line).ok_or(AlmanacError::MissingQueryLine)?;
    if label.is_empty() {
        return Err(AlmanacError::MissingQueryLine);
    }
    Ok((label, parse_ints(rest)?))
}

fn parse_stage(group: &[(usize, &str)]) -> anyhow::Result<Stage> {
    let (header_no, header) = group[0];
    let (source, destination) = parse_header(header).with_context(|| format!("line {}", header_no))?;

    let mappings = group[1..]
        .iter()
        .map(|&(line_no, line)| parse_mapping(line).with_context(|| format!("line {}", line_no)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Stage::new(source, destination, mappings)
        .and_then(|stage| stage.check_invertible().map(|()| stage))
        .map_err(AlmanacError::from)
        .with_context(|| format!("map starting at line {}", header_no))
}

fn parse_header(line: &str) -> Result<(&str, &str), AlmanacError> {
    let bad = || AlmanacError::BadHeader(line.to_string());
    let name = line
        .strip_suffix(':')
        .and_then(|l| l.trim_end().strip_suffix("map"))
        .ok_or_else(bad)?
        .trim();
    let (source, destination) = name.split_once("-to-").ok_or_else(bad)?;
    if source.is_empty() || destination.is_empty() {
        return Err(bad());
    }
    Ok((source, destination))
}

fn parse_mapping(line: &str) -> Result<RangeMapping, AlmanacError> {
    let fields: Vec<Value> = parse_ints(line)?;
    let &[destination, source, len] = fields.as_slice() else {
        return Err(AlmanacError::FieldCount(fields.len()));
    };
    Ok(RangeMapping::new(destination, source, len)?)
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let resolver = ChainResolver::new(&shared.chain);
        let terminals = shared
            .values
            .iter()
            .map(|&v| resolver.resolve_to_terminal(v, 0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))?;

        terminals
            .into_iter()
            .min()
            .map(|v| v.to_string())
            .ok_or_else(|| SolveError::SolveFailed(format!("no {} listed", shared.label).into()))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let admissible = MultiRange::from_start_len_pairs(&shared.values)
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))?;
        let limit = SearchLimit::default();

        let resolver = ChainResolver::new(&shared.chain);
        let found = resolver
            .min_terminal_with_origin_in(&admissible, limit)
            .map_err(|e| SolveError::SolveFailed(Box::new(e)))?;
        match found {
            Some(terminal) => {
                tracing::info!(terminal, ranges = admissible.ranges().len(), "found lowest {}", shared.chain.terminal());
                Ok(terminal.to_string())
            }
            None => Err(SolveError::SolveFailed(
                format!(
                    "no {} up to {} maps back into the {} ranges",
                    shared.chain.terminal(),
                    limit.max_terminal,
                    shared.label
                )
                .into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "\
seeds: 79 14 55 13

seed-to-soil map:
50 98 2
52 50 48

soil-to-fertilizer map:
0 15 37
37 52 2
39 0 15

fertilizer-to-water map:
49 53 8
0 11 42
42 0 7
57 7 4

water-to-light map:
88 18 7
18 25 70

light-to-temperature map:
45 77 23
81 45 19
68 64 13

temperature-to-humidity map:
0 69 1
1 0 69

humidity-to-location map:
60 56 37
56 93 4
";

    fn parse_err(input: &str) -> String {
        match Solver::parse(input) {
            Err(ParseError::InvalidFormat(msg)) => msg,
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_example() {
        let almanac = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(almanac.label(), "seeds");
        assert_eq!(almanac.values(), &[79, 14, 55, 13]);
        assert_eq!(almanac.chain().len(), 7);
        assert_eq!(almanac.chain().origin(), "seed");
        assert_eq!(almanac.chain().terminal(), "location");
        assert_eq!(
            almanac.chain().stages()[0].mappings()[0],
            RangeMapping::new(50, 98, 2).unwrap()
        );
    }

    #[test]
    fn test_example_part1() {
        let mut almanac = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut almanac, 1).unwrap(), "35");
    }

    #[test]
    fn test_example_part2() {
        let mut almanac = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut almanac, 2).unwrap(), "46");
    }

    #[test]
    fn test_example_seed_locations() {
        let almanac = Solver::parse(EXAMPLE).unwrap();
        let resolver = ChainResolver::new(almanac.chain());
        let locations: Vec<_> = [79, 14, 55, 13]
            .into_iter()
            .map(|seed| resolver.resolve_to_terminal(seed, 0).unwrap())
            .collect();
        assert_eq!(locations, vec![82, 43, 86, 35]);

        let last = almanac.chain().last_index();
        for (seed, location) in [79, 14, 55, 13].into_iter().zip(locations) {
            assert_eq!(resolver.resolve_to_origin(location, last).unwrap(), seed);
        }
    }

    #[test]
    fn test_two_stage_input() {
        let input = "seeds: 98 97\n\nseed-to-soil map:\n50 98 2\n98 50 2\n\nsoil-to-location map:\n5 1000 1\n1000 5 1\n";
        let mut almanac = Solver::parse(input).unwrap();
        assert_eq!(Solver::solve_part(&mut almanac, 1).unwrap(), "50");
        assert_eq!(Solver::solve_part(&mut almanac, 2).unwrap(), "50");
    }

    #[test]
    fn test_passthrough_collision_rejected() {
        // seed 98 and seed 10 would both land on location 10
        let msg = parse_err("seeds: 10 11\n\nseed-to-location map:\n10 98 2");
        assert!(msg.starts_with("map starting at line 3"), "{}", msg);
        assert!(msg.contains("two preimages"), "{}", msg);
    }

    #[test]
    fn test_partial_permutation_rejected() {
        let input = EXAMPLE.replace("52 50 48", "52 50 47");
        let msg = parse_err(&input);
        assert!(msg.contains("map starting at line 3"), "{}", msg);
        assert!(msg.contains("[97, 97]"), "{}", msg);
    }

    #[test]
    fn test_bad_integer_names_line() {
        let input = EXAMPLE.replace("52 50 48", "52 5x 48");
        let msg = parse_err(&input);
        assert!(msg.starts_with("line 5"), "{}", msg);
        assert!(msg.contains("invalid integer"), "{}", msg);
    }

    #[test]
    fn test_wrong_field_count() {
        let input = EXAMPLE.replace("50 98 2", "50 98");
        let msg = parse_err(&input);
        assert!(msg.contains("line 4"), "{}", msg);
        assert!(msg.contains("expected 3 integers, found 2"), "{}", msg);
    }

    #[test]
    fn test_bad_header() {
        let input = EXAMPLE.replace("seed-to-soil map:", "seed to soil map:");
        assert!(parse_err(&input).contains("expected '<source>-to-<destination> map:'"));
    }

    #[test]
    fn test_disconnected_chain() {
        let input = EXAMPLE.replace("soil-to-fertilizer", "dirt-to-fertilizer");
        assert!(parse_err(&input).contains("'dirt'"));
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let input = EXAMPLE.replace("52 50 48", "52 50 49");
        assert!(parse_err(&input).contains("overlap"));
    }

    #[test]
    fn test_missing_query_line() {
        assert!(parse_err("").contains("empty almanac"));
        assert!(parse_err("79 14\n\nseed-to-soil map:\n50 98 2").contains("line 1"));
        assert!(parse_err("seeds: 1\n2\n\nseed-to-soil map:\n50 98 2").contains("line 2"));
    }

    #[test]
    fn test_no_maps() {
        assert!(parse_err("seeds: 1 2").contains("at least one stage"));
    }

    #[test]
    fn test_map_without_ranges_is_identity() {
        let mut almanac = Solver::parse("seeds: 7 3\n\nseed-to-soil map:\n").unwrap();
        assert!(almanac.chain().stages()[0].mappings().is_empty());
        assert_eq!(Solver::solve_part(&mut almanac, 1).unwrap(), "3");
        assert_eq!(Solver::solve_part(&mut almanac, 2).unwrap(), "7");
    }

    #[test]
    fn test_empty_seed_list_fails_part1() {
        let mut almanac = Solver::parse("seeds:\n\nseed-to-soil map:\n50 98 2\n98 50 2").unwrap();
        assert!(matches!(
            Solver::solve_part(&mut almanac, 1),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_unpaired_seeds_fail_part2() {
        let mut almanac = Solver::parse("seeds: 79 14 55\n\nseed-to-soil map:\n50 98 2\n98 50 2").unwrap();
        assert!(matches!(
            Solver::solve_part(&mut almanac, 2),
            Err(SolveError::SolveFailed(_))
        ));
    }
}
