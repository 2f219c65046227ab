use aoc_solutions as _;
use aoc_solver::{SolveError, SolverError, SolverRegistryBuilder};

const EXAMPLE: &str = include_str!("data/2023_day05_example.txt");

fn registry() -> aoc_solver::SolverRegistry {
    SolverRegistryBuilder::new()
        .register_solver_plugins(|plugin| plugin.tags.contains(&"ranges"))
        .unwrap()
        .build()
}

#[test]
fn test_day_5_is_registered_with_tags() {
    let plugin = aoc_solver::inventory::iter::<aoc_solver::SolverPlugin>()
        .find(|p| p.year == 2023 && p.day == 5)
        .expect("2023 day 5 should be registered");
    assert_eq!(plugin.tags, &["2023", "ranges"]);

    let info = registry().storage().get_info(2023, 5).unwrap();
    assert_eq!(info.parts, 2);
}

#[test]
fn test_day_5_example_through_registry() {
    let registry = registry();
    let mut solver = registry.create_solver(2023, 5, EXAMPLE).unwrap();
    assert_eq!(solver.parts(), 2);
    assert_eq!(solver.solve(1).unwrap().answer, "35");
    assert_eq!(solver.solve(2).unwrap().answer, "46");
    assert!(matches!(solver.solve(3), Err(SolveError::PartOutOfRange(3))));
}

#[test]
fn test_day_5_malformed_input() {
    let registry = registry();
    let result = registry.create_solver(2023, 5, "seeds: 1 2\n\nseed-to-soil map:\n1 2\n");
    assert!(matches!(result, Err(SolverError::ParseError(_))));
}
