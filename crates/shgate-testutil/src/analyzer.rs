//! Analyzer fixture runner.
//!
//! Headers configure the policy:
//!
//! - `# allow: relative var-relative` — features (`none` clears)
//! - `# commands: mytool other` — extra allowed commands
//!
//! The expected section lists one issue per line as `line:col command`, in
//! the order the analyzer reports them. An empty section means no issues.

use shgate_kernel::{analyze, parse, Feature, PolicyRegistry};

use crate::{split_cases, RawCase, TestResult, TestSummary};

/// A single analyzer test case.
#[derive(Debug, Clone)]
pub struct AnalyzerTestCase {
    pub name: String,
    pub line_number: usize,
    pub allow: Vec<String>,
    pub commands: Vec<String>,
    pub input: String,
    pub expected: String,
}

impl From<RawCase> for AnalyzerTestCase {
    fn from(raw: RawCase) -> Self {
        let words = |key: &str| -> Vec<String> {
            raw.header(key)
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };
        Self {
            allow: words("allow"),
            commands: words("commands"),
            name: raw.name.clone(),
            line_number: raw.line_number,
            input: raw.input.clone(),
            expected: raw.expected.clone(),
        }
    }
}

/// Parse the fixture format into analyzer test cases.
pub fn parse_analyzer_tests(content: &str) -> Vec<AnalyzerTestCase> {
    split_cases(content).into_iter().map(Into::into).collect()
}

impl AnalyzerTestCase {
    fn policy(&self) -> Result<PolicyRegistry, String> {
        let mut builder = PolicyRegistry::builder().commands(self.commands.iter().cloned());
        for switch in &self.allow {
            builder = match Feature::parse_switch(switch).map_err(|e| e.to_string())? {
                Some(feature) => builder.feature(feature),
                None => builder.clear_features(),
            };
        }
        Ok(builder.build())
    }

    pub fn run(&self) -> TestResult {
        let policy = match self.policy() {
            Ok(policy) => policy,
            Err(message) => return TestResult::Error { message },
        };
        let script = match parse(&self.input, &self.name) {
            Ok(script) => script,
            Err(e) => {
                return TestResult::Error {
                    message: format!("parse failed: {e}"),
                };
            }
        };

        let actual = analyze(&script, &policy)
            .iter()
            .map(|issue| format!("{} {}", issue.position, issue.command))
            .collect::<Vec<_>>()
            .join("\n");
        TestResult::compare(&self.expected, &actual)
    }
}

/// Run all analyzer test cases and return a summary.
pub fn run_analyzer_tests(cases: &[AnalyzerTestCase]) -> TestSummary {
    let mut summary = TestSummary::new();
    for case in cases {
        summary.record(&case.name, case.line_number, case.run());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_configure_policy() {
        let content = "
# test: relaxed
# allow: relative
# commands: mytool
---
./run.sh
mytool
wget x
---
3:1 wget
===
";
        let cases = parse_analyzer_tests(content);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].allow, vec!["relative"]);
        assert_eq!(cases[0].commands, vec!["mytool"]);
        assert!(cases[0].run().is_pass());
    }

    #[test]
    fn bad_feature_is_an_error() {
        let content = "# test: bad\n# allow: sometimes\n---\ntrue\n---\n===\n";
        let cases = parse_analyzer_tests(content);
        assert!(matches!(cases[0].run(), TestResult::Error { .. }));
    }
}
