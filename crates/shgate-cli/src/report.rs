//! Collected results of a run and their rendering.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use shgate_kernel::Issue;

use crate::driver::ScriptError;

/// A script that could not be checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptFailure {
    pub path: String,
    pub message: String,
}

impl ScriptFailure {
    pub fn new(path: &Path, error: &ScriptError) -> Self {
        Self {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}

/// Everything found across all scripts of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub issues: Vec<Issue>,
    pub failures: Vec<ScriptFailure>,
}

impl Report {
    /// Order issues by (path, line, column) for reproducible output.
    pub fn sort(&mut self) {
        self.issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.failures.is_empty()
    }

    /// 0 when clean, otherwise issues plus failed scripts, clamped to 255.
    pub fn exit_status(&self) -> u8 {
        let problems = self.issues.len() + self.failures.len();
        u8::try_from(problems).unwrap_or(u8::MAX)
    }

    /// One line per failure, then one line per issue.
    pub fn write_text(&self, out: &mut impl Write, cwd: &Path) -> Result<()> {
        for failure in &self.failures {
            writeln!(out, "{}: {}", display_path(&failure.path, cwd), failure.message)
                .context("Failed to write report")?;
        }
        for issue in &self.issues {
            writeln!(out, "{}", issue.display_with_path(&display_path(&issue.path, cwd)))
                .context("Failed to write report")?;
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut impl Write, cwd: &Path) -> Result<()> {
        let mut relative = self.clone();
        for issue in &mut relative.issues {
            issue.path = display_path(&issue.path, cwd);
        }
        for failure in &mut relative.failures {
            failure.path = display_path(&failure.path, cwd);
        }
        serde_json::to_writer_pretty(&mut *out, &relative).context("Failed to write JSON report")?;
        writeln!(out).context("Failed to write JSON report")?;
        Ok(())
    }
}

/// `path` relative to `cwd` when it lies beneath it, unchanged otherwise.
pub fn display_path(path: &str, cwd: &Path) -> String {
    match Path::new(path).strip_prefix(cwd) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.display().to_string(),
        _ => path.to_string(),
    }
}
