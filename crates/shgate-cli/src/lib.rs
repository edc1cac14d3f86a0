//! shgate — verify the external commands shell scripts need.
//!
//! The binary parses each script, runs the kernel analyzer against one
//! shared policy, and reports every call to a command outside the allow
//! list. The exit status is the number of problems found (clamped to 255).
//!
//! - `config`: optional TOML config file (`allow`, `commands`)
//! - `driver`: read + parse + analyze one script
//! - `report`: collect, sort and render results

pub mod config;
pub mod driver;
pub mod report;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};

use shgate_kernel::ast::sexpr::format_script;
use shgate_kernel::{format_builtins, Feature, PolicyRegistry};

use config::Config;
use driver::check_path;
use report::{Report, ScriptFailure};

/// Width of the builtin command list in `--help`.
const HELP_WIDTH: usize = 70;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "shgate",
    version,
    about = "Verifies shell script requirements on external commands against an allow list."
)]
pub struct Cli {
    /// Enable optional features. `none` clears features enabled before it.
    #[arg(short = 'a', long = "allow", value_enum, value_name = "FEATURE", default_value = "none")]
    pub allow: Vec<AllowArg>,

    /// Extra commands to allow.
    #[arg(short = 'c', long = "cmd", value_name = "CMD")]
    pub cmds: Vec<String>,

    /// TOML config file with `allow` and `commands` lists.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print each script's syntax tree to stdout before checking it.
    #[arg(long)]
    pub dump_tree: bool,

    /// Shell scripts to validate.
    #[arg(value_name = "SCRIPT", required = true)]
    pub scripts: Vec<PathBuf>,
}

/// Values accepted by `--allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AllowArg {
    None,
    Relative,
    VarRelative,
}

impl AllowArg {
    fn feature(self) -> Option<Feature> {
        match self {
            AllowArg::None => None,
            AllowArg::Relative => Some(Feature::Relative),
            AllowArg::VarRelative => Some(Feature::VarRelative),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `path:line:col: message` lines on stderr
    Text,
    /// One JSON document on stdout
    Json,
}

/// Long help text: the description followed by every builtin command name.
pub fn long_about() -> String {
    format!(
        "Verifies shell script requirements on external commands against an allow list:\n\n  {}",
        format_builtins(HELP_WIDTH).replace('\n', "\n  ")
    )
}

/// Parse process arguments, exiting with clap's usage error on failure.
pub fn parse_args() -> Cli {
    let matches = Cli::command().long_about(long_about()).get_matches();
    match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    }
}

/// Merge the config file and the command line into one policy.
///
/// Config values apply first. `--allow none` clears every feature enabled
/// before it, including those from the config file.
pub fn build_policy(config: &Config, cli: &Cli) -> Result<PolicyRegistry> {
    let mut builder = PolicyRegistry::builder()
        .commands(config.commands.iter().cloned())
        .commands(cli.cmds.iter().cloned());

    for switch in &config.allow {
        let feature = Feature::parse_switch(switch)
            .with_context(|| format!("Invalid `allow` entry in config: {switch:?}"))?;
        builder = match feature {
            Some(feature) => builder.feature(feature),
            None => builder.clear_features(),
        };
    }
    for arg in &cli.allow {
        builder = match arg.feature() {
            Some(feature) => builder.feature(feature),
            None => builder.clear_features(),
        };
    }

    Ok(builder.build())
}

/// Check every script named on the command line.
///
/// Syntax trees go to `trees` when `--dump-tree` is set. A script that cannot
/// be read or parsed is recorded as a failure; the others are still checked.
pub fn check(cli: &Cli, trees: &mut impl Write) -> Result<Report> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let policy = build_policy(&config, cli)?;
    tracing::debug!(
        known = policy.len(),
        features = ?policy.features(),
        "policy ready"
    );

    let mut report = Report::default();
    for path in &cli.scripts {
        match check_path(path, &policy) {
            Ok(checked) => {
                if cli.dump_tree {
                    writeln!(trees, "{}", format_script(&checked.script))
                        .context("Failed to write syntax tree")?;
                }
                report.issues.extend(checked.issues);
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "script not checked");
                report.failures.push(ScriptFailure::new(path, &e));
            }
        }
    }
    report.sort();
    Ok(report)
}

/// Check, render, and return the process exit status.
pub fn run(cli: &Cli) -> Result<u8> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let report = check(cli, &mut std::io::stdout().lock())?;

    match cli.format {
        OutputFormat::Text => report.write_text(&mut std::io::stderr().lock(), &cwd)?,
        OutputFormat::Json => report.write_json(&mut std::io::stdout().lock(), &cwd)?,
    }

    Ok(report.exit_status())
}
