//! Output formatting for solver results
//!
//! Answers go to stdout and failures to stderr, one block per day.

use crate::aggregator::DayReport;
use crate::error::{InputError, PartError};
use aoc_solver::SolverError;
use chrono::TimeDelta;

/// A rendered line and the stream it belongs on
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Answer(String),
    Failure(String),
}

/// Output formatter for solver results
pub struct OutputFormatter {
    quiet: bool,
    start_time: std::time::Instant,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn print_day(&self, report: &DayReport) {
        let lines = if self.quiet {
            render_quiet(report)
        } else {
            render_day(report)
        };
        for line in lines {
            match line {
                Line::Answer(text) => println!("{}", text),
                Line::Failure(text) => eprintln!("{}", text),
            }
        }
    }

    /// Totals for the run, with wall-clock time next to the summed compute time
    pub fn print_summary(&self, reports: &[DayReport]) {
        if self.quiet {
            return;
        }
        let summary = Summary::of(reports);
        let elapsed_time = self.start_time.elapsed();

        println!();
        println!("--- Summary ---");
        println!(
            "Days: {}, parts: {} solved, {} failed",
            summary.days, summary.solved, summary.failed
        );
        println!("Total parse time: {}", format_duration(summary.parse_time));
        println!("Total solve time: {}", format_duration(summary.solve_time));
        println!(
            "Elapsed wall-clock time: {}",
            format_std_duration(elapsed_time)
        );
        if !elapsed_time.is_zero() {
            let compute = summary.parse_time + summary.solve_time;
            let compute_secs = compute.num_microseconds().unwrap_or(0) as f64 / 1_000_000.0;
            println!("Speedup factor: {:.2}x", compute_secs / elapsed_time.as_secs_f64());
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Summary {
    days: usize,
    solved: usize,
    failed: usize,
    parse_time: TimeDelta,
    solve_time: TimeDelta,
}

impl Summary {
    fn of(reports: &[DayReport]) -> Self {
        let solved: usize = reports.iter().map(DayReport::solved).sum();
        let parts: usize = reports.iter().map(|r| r.parts.len()).sum();
        Self {
            days: reports.len(),
            solved,
            failed: parts - solved,
            parse_time: reports.iter().filter_map(DayReport::parse_time).sum(),
            solve_time: reports.iter().map(DayReport::solve_time).sum(),
        }
    }
}

fn render_quiet(report: &DayReport) -> Vec<Line> {
    report
        .parts
        .iter()
        .map(|r| match &r.answer {
            Ok(answer) => Line::Answer(answer.clone()),
            Err(e) => Line::Failure(format!("Error: {}", describe(e))),
        })
        .collect()
}

/// A header with the day's parse time, then one line per part. When every
/// part failed for the same reason the reason goes on the header instead.
fn render_day(report: &DayReport) -> Vec<Line> {
    let prefix = format!("{}/{:02}", report.year, report.day);

    let errors: Vec<String> = report
        .parts
        .iter()
        .filter_map(|r| r.answer.as_ref().err())
        .map(describe)
        .collect();
    if errors.len() == report.parts.len() && errors.windows(2).all(|w| w[0] == w[1]) {
        if let Some(reason) = errors.first() {
            return vec![Line::Failure(format!("{}: {}", prefix, reason))];
        }
    }

    let header = match report.parse_time() {
        Some(d) => format!("{} (parse: {})", prefix, format_duration(d)),
        None => prefix,
    };
    let mut lines = vec![Line::Answer(header)];
    lines.extend(report.parts.iter().map(|r| match &r.answer {
        Ok(answer) => Line::Answer(format!(
            "  Part {}: {} (solve: {})",
            r.part,
            answer,
            format_duration(r.solve_duration)
        )),
        Err(e) => Line::Failure(format!("  Part {}: {}", r.part, describe(e))),
    }));
    lines
}

/// One phrase per failure kind, so a missing input reads differently from a
/// malformed one or from a solver that gave up
fn describe(error: &PartError) -> String {
    match error {
        PartError::Input(e) => match &**e {
            InputError::Missing { path, .. } => format!("no input at {}", path.display()),
            InputError::Read { path, source } => {
                format!("cannot read {}: {}", path.display(), source)
            }
        },
        PartError::Solver(e) => match &**e {
            SolverError::ParseError(e) => format!("input rejected: {}", e),
            SolverError::SolveError(e) => format!("no answer: {}", e),
            other => other.to_string(),
        },
    }
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

/// Wall-clock counterpart of [`format_duration`]
fn format_std_duration(d: std::time::Duration) -> String {
    TimeDelta::from_std(d).map_or_else(|_| "N/A".to_string(), format_duration)
}
