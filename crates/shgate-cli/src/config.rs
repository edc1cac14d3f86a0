//! Config file support.
//!
//! ```toml
//! # shgate.toml
//! allow = ["relative"]
//! commands = ["git", "curl"]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Policy settings read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Feature switches: `none`, `relative`, `var-relative`.
    pub allow: Vec<String>,
    /// Extra commands to allow.
    pub commands: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
