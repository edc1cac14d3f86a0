//! Integration tests for the analyzer using the fixture format.

use shgate_testutil::analyzer::{parse_analyzer_tests, run_analyzer_tests};

const COMMANDS_TEST: &str = include_str!("../../../tests/analyzer/commands.test");

#[test]
fn run_analyzer_test_file() {
    let cases = parse_analyzer_tests(COMMANDS_TEST);
    assert!(!cases.is_empty(), "fixture file has no cases");

    let summary = run_analyzer_tests(&cases);
    println!("{}", summary);

    assert!(
        summary.all_passed(),
        "analyzer fixtures had {} failures and {} errors",
        summary.failed,
        summary.errors
    );
}
