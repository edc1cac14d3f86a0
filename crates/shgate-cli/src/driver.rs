//! Per-script pipeline: read, parse, analyze.

use std::path::Path;

use thiserror::Error;

use shgate_kernel::{analyze, parse, Issue, ParseError, PolicyRegistry, Script};

/// Why a script could not be checked.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("error: could not read script: {0}")]
    Read(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A successfully analyzed script.
#[derive(Debug)]
pub struct Checked {
    pub script: Script,
    pub issues: Vec<Issue>,
}

/// Check the script at `path`. The script is named by its path as given.
pub fn check_path(path: &Path, policy: &PolicyRegistry) -> Result<Checked, ScriptError> {
    let source = std::fs::read_to_string(path)?;
    check_source(&source, &path.display().to_string(), policy)
}

/// Check in-memory source named `name`.
pub fn check_source(
    source: &str,
    name: &str,
    policy: &PolicyRegistry,
) -> Result<Checked, ScriptError> {
    let script = parse(source, name)?;
    let issues = analyze(&script, policy);
    Ok(Checked { script, issues })
}
