//! Line-oriented text parsing helpers.
//!
//! Puzzle inputs are small static files; these helpers keep the per-day
//! parsers down to the part that is actually puzzle specific. Line numbers
//! are 1-based so they can go straight into error messages.

use std::str::FromStr;

/// Lines of `input` with surrounding whitespace removed, paired with their
/// 1-based line number.
pub fn trimmed_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
}

/// Parse a whitespace-separated list of integers.
///
/// ```
/// use aoc_solutions::utils::text::parse_ints;
///
/// assert_eq!(parse_ints::<i64>(" 79 14  55 13 ").unwrap(), vec![79, 14, 55, 13]);
/// assert!(parse_ints::<i64>("79 x").is_err());
/// ```
pub fn parse_ints<T: FromStr>(s: &str) -> Result<Vec<T>, T::Err> {
    s.split_whitespace().map(str::parse).collect()
}

/// Split `label: rest` at the first colon, trimming both halves.
pub fn split_label(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
        .map(|(label, rest)| (label.trim(), rest.trim()))
}

/// Group trimmed, numbered lines into blocks separated by blank lines.
///
/// Runs of blank lines (and leading/trailing ones) never produce empty groups.
pub fn blank_line_groups(input: &str) -> Vec<Vec<(usize, &str)>> {
    let mut groups: Vec<Vec<(usize, &str)>> = Vec::new();
    let mut current = Vec::new();
    for (line_no, line) in trimmed_lines(input) {
        if line.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push((line_no, line));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
