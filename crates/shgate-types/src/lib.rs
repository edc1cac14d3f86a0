//! shgate-types: pure data types shared across shgate crates.
//!
//! Nothing in here parses or analyzes shell. The types describe:
//!
//! - **Position**: a 1-based `line:column` location in a script
//! - **Issue**: one disallowed command invocation
//! - **Feature**: an optional exemption rule of the allow-list policy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 1-based source location. Columns count bytes, not characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A call to an external command that the policy does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Identifier of the script the call was found in (usually its path).
    pub path: String,
    /// Location of the call expression.
    pub position: Position,
    /// The command name as resolved from the script text.
    pub command: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, position: Position, command: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            position,
            command: command.into(),
        }
    }

    /// Render the diagnostic line with `path` substituted for the stored path.
    ///
    /// Drivers use this to print paths relative to the working directory.
    pub fn display_with_path(&self, path: &str) -> String {
        format!(
            "{}:{}: unsupported external command: {}",
            path, self.position, self.command
        )
    }

    /// Ordering key used for stable presentation.
    pub fn sort_key(&self) -> (&str, Position) {
        (self.path.as_str(), self.position)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with_path(&self.path))
    }
}

/// Optional exemption rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// Commands invoked through a relative path (`./tools/build.sh`) are allowed.
    Relative,
    /// Commands whose name starts with `$` are allowed.
    VarRelative,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Relative, Feature::VarRelative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Relative => "relative",
            Feature::VarRelative => "var-relative",
        }
    }

    /// Parse a feature switch where `none` means "no feature".
    pub fn parse_switch(s: &str) -> Result<Option<Feature>, FeatureParseError> {
        if s == "none" {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown feature name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature {0:?} (expected one of: none, relative, var-relative)")]
pub struct FeatureParseError(pub String);

impl FromStr for Feature {
    type Err = FeatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative" => Ok(Feature::Relative),
            "var-relative" => Ok(Feature::VarRelative),
            other => Err(FeatureParseError(other.to_string())),
        }
    }
}
