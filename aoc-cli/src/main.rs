//! AOC CLI - Command-line interface for running Advent of Code solvers

mod aggregator;
mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Import aoc-solutions to link the solver plugins
use aoc_solutions as _;

use aggregator::DayCollector;
use aoc_solver::SolverRegistryBuilder;
use clap::Parser;
use cli::Args;
use config::Config;
use executor::Executor;
use output::OutputFormatter;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::from_args(Args::parse());
    init_tracing(config.log_level);

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout carries only answers
fn init_tracing(default_level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: Config) -> Result<(), error::CliError> {
    let registry = build_registry(&config.tags)?;
    tracing::debug!(solvers = registry.storage().len(), tags = ?config.tags, "registry built");

    let executor = Executor::new(registry, &config).map_err(error::ArcExecutorError::from)?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    let missing: Vec<_> = work_items
        .iter()
        .filter(|w| !executor.inputs().contains(w.year, w.day))
        .map(|w| executor.inputs().input_path(w.year, w.day))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(count = missing.len(), "some inputs are missing, their parts will fail");
        for path in &missing {
            tracing::warn!(path = %path.display(), "missing input");
        }
    }

    run_executor(executor, config.quiet)
}

/// Run the executor and print each day as soon as it and all earlier days are done
fn run_executor(executor: Executor, quiet: bool) -> Result<(), error::CliError> {
    let work_items = executor.collect_work_items();
    if !quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let mut collector = DayCollector::new(&work_items);

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    let formatter = OutputFormatter::new(quiet);
    let mut days = Vec::new();

    for result in rx {
        for day in collector.add(result) {
            formatter.print_day(&day);
            days.push(day);
        }
    }

    let outstanding = collector.outstanding();
    if outstanding > 0 {
        tracing::warn!(outstanding, "not all expected results were received");
    }
    for day in collector.finish() {
        formatter.print_day(&day);
        days.push(day);
    }

    executor_handle
        .join()
        .map_err(|_| error::CliError::Config("Executor thread panicked".to_string()))?
        .map_err(error::CliError::Executor)?;

    formatter.print_summary(&days);

    Ok(())
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<aoc_solver::SolverRegistry, error::CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
