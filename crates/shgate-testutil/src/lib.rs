//! Test utilities for shgate.
//!
//! Provides parsers and runners for the fixture formats used in the repo:
//! - `tests/parser/*.test` — script input with the expected lowered tree
//! - `tests/analyzer/*.test` — script input, policy headers, expected issues
//!
//! Both formats share one layout:
//!
//! ```text
//! # test: name
//! # key: value          (zero or more headers)
//! ---
//! input script
//! ---
//! expected output
//! ===
//! ```

pub mod analyzer;
pub mod parser;

use std::fmt;

/// The result of running a single test case.
#[derive(Debug, Clone)]
pub enum TestResult {
    Pass,
    Fail { expected: String, actual: String },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    /// Pass when `actual` equals `expected` after trimming.
    pub fn compare(expected: &str, actual: &str) -> Self {
        if expected.trim() == actual.trim() {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: expected.trim().to_string(),
                actual: actual.trim().to_string(),
            }
        }
    }
}

/// Summary of running multiple test cases.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub failures: Vec<TestFailure>,
}

/// A single test failure with context.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    pub line: usize,
    pub result: TestResult,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        match &result {
            TestResult::Pass => {
                self.passed += 1;
                return;
            }
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.failures.push(TestFailure {
            name: name.into(),
            line,
            result,
        });
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "═".repeat(60))?;
        writeln!(f, "Test Summary: {} total", self.total())?;
        writeln!(
            f,
            "  ✓ {} passed  ✗ {} failed  ⚠ {} errors",
            self.passed, self.failed, self.errors
        )?;

        if !self.failures.is_empty() {
            writeln!(f, "\nFailures:")?;
            for failure in &self.failures {
                writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
                match &failure.result {
                    TestResult::Fail { expected, actual } => {
                        writeln!(f, "    expected: {}", expected)?;
                        writeln!(f, "    actual:   {}", actual)?;
                    }
                    TestResult::Error { message } => {
                        writeln!(f, "    error: {}", message)?;
                    }
                    TestResult::Pass => {}
                }
            }
        }
        writeln!(f, "{}", "═".repeat(60))?;
        Ok(())
    }
}

/// One case in the shared fixture layout, before format-specific parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCase {
    pub name: String,
    /// Line of the `# test:` header (1-indexed).
    pub line_number: usize,
    /// `# key: value` headers after the test line, in order.
    pub headers: Vec<(String, String)>,
    pub input: String,
    pub expected: String,
}

impl RawCase {
    /// Value of the first header named `key`.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Split fixture file content into raw cases.
pub fn split_cases(content: &str) -> Vec<RawCase> {
    let lines: Vec<&str> = content.lines().collect();
    let mut cases = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let name = name.trim().to_string();
        let line_number = i + 1;
        i += 1;

        // Headers until the first ---
        let mut headers = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            if let Some((key, value)) = lines[i].trim().strip_prefix('#').and_then(|h| h.split_once(':')) {
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
            i += 1;
        }
        i += 1; // skip the ---

        // Input until the next ---
        let mut input_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            input_lines.push(lines[i]);
            i += 1;
        }
        i += 1; // skip the ---

        // Expected until ===
        let mut expected_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            expected_lines.push(lines[i]);
            i += 1;
        }
        i += 1; // skip the ===

        let mut input = input_lines.join("\n");
        input.push('\n');

        cases.push(RawCase {
            name,
            line_number,
            headers,
            input,
            expected: expected_lines.join("\n").trim().to_string(),
        });
    }

    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_single_case() {
        let content = "
# test: simple
# allow: relative
---
echo hi
./x
---
2:1 ./x
===
";
        let cases = split_cases(content);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "simple");
        assert_eq!(cases[0].line_number, 2);
        assert_eq!(cases[0].header("allow"), Some("relative"));
        assert_eq!(cases[0].header("commands"), None);
        assert_eq!(cases[0].input, "echo hi\n./x\n");
        assert_eq!(cases[0].expected, "2:1 ./x");
    }

    #[test]
    fn split_multiple_cases_with_empty_expectation() {
        let content = "# test: a\n---\ntrue\n---\n===\n# test: b\n---\nx\n---\n1:1 x\n===\n";
        let cases = split_cases(content);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].expected, "");
        assert_eq!(cases[1].name, "b");
        assert_eq!(cases[1].line_number, 6);
    }

    #[test]
    fn summary_records() {
        let mut summary = TestSummary::new();
        summary.record("ok", 1, TestResult::Pass);
        summary.record("bad", 2, TestResult::compare("a", "b"));
        summary.record("err", 3, TestResult::Error { message: "boom".into() });
        assert_eq!(summary.total(), 3);
        assert!(!summary.all_passed());
        assert_eq!(summary.failures.len(), 2);
        assert!(summary.to_string().contains("bad (line 2)"));
    }
}
