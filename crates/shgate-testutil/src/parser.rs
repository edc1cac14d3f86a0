//! Parser fixture runner.
//!
//! Cases in `tests/parser/*.test` give a script and either the expected
//! S-expression of the lowered tree, or (with `# expect: error`) the
//! expectation that parsing fails. The expected text of an error case is
//! documentation only; parser messages are not compared.

use shgate_kernel::ast::sexpr::format_script;
use shgate_kernel::parser::parse;

use crate::{split_cases, RawCase, TestResult, TestSummary};

/// What we expect from parsing an input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserExpectation {
    Ok(String),
    Error,
}

/// A single parser test case.
#[derive(Debug, Clone)]
pub struct ParserTestCase {
    pub name: String,
    pub line_number: usize,
    pub input: String,
    pub expected: ParserExpectation,
}

impl From<RawCase> for ParserTestCase {
    fn from(raw: RawCase) -> Self {
        let expected = match raw.header("expect") {
            Some("error") => ParserExpectation::Error,
            _ => ParserExpectation::Ok(raw.expected.clone()),
        };
        Self {
            name: raw.name,
            line_number: raw.line_number,
            input: raw.input,
            expected,
        }
    }
}

/// Parse the fixture format into parser test cases.
pub fn parse_parser_tests(content: &str) -> Vec<ParserTestCase> {
    split_cases(content).into_iter().map(Into::into).collect()
}

impl ParserTestCase {
    pub fn run(&self) -> TestResult {
        match (parse(&self.input, &self.name), &self.expected) {
            (Ok(script), ParserExpectation::Ok(expected)) => {
                TestResult::compare(&normalize(expected), &normalize(&format_script(&script)))
            }
            (Ok(script), ParserExpectation::Error) => TestResult::Fail {
                expected: "parse error".to_string(),
                actual: format_script(&script),
            },
            (Err(_), ParserExpectation::Error) => TestResult::Pass,
            (Err(e), ParserExpectation::Ok(expected)) => TestResult::Fail {
                expected: expected.clone(),
                actual: format!("error: {e}"),
            },
        }
    }
}

/// Collapse whitespace so expectations may be wrapped freely.
fn normalize(sexpr: &str) -> String {
    sexpr.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run all parser test cases and return a summary.
pub fn run_parser_tests(cases: &[ParserTestCase]) -> TestSummary {
    let mut summary = TestSummary::new();
    for case in cases {
        summary.record(&case.name, case.line_number, case.run());
    }
    summary
}
