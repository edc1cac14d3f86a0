//! Integration tests for the shgate driver.
//!
//! Scripts are written to a temp dir and checked through the same `Cli`
//! value the binary builds from its arguments.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use shgate_cli::{build_policy, check, long_about, AllowArg, Cli};
use shgate_cli::config::Config;
use shgate_cli::report::Report;

fn write_script(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("write script");
    path
}

fn cli(args: &[&str], scripts: &[&Path]) -> Cli {
    let mut argv: Vec<String> = vec!["shgate".to_string()];
    argv.extend(args.iter().map(|s| s.to_string()));
    argv.extend(scripts.iter().map(|p| p.display().to_string()));
    Cli::try_parse_from(argv).expect("valid arguments")
}

fn run_check(cli: &Cli) -> Report {
    let mut trees = Vec::new();
    check(cli, &mut trees).expect("check should succeed")
}

fn render(report: &Report, cwd: &Path) -> String {
    let mut out = Vec::new();
    report.write_text(&mut out, cwd).expect("render");
    String::from_utf8(out).expect("utf8")
}

// ============================================================================
// Argument parsing
// ============================================================================

#[test]
fn allow_defaults_to_none() {
    let cli = cli(&[], &[Path::new("x.sh")]);
    assert_eq!(cli.allow, vec![AllowArg::None]);
    assert!(cli.cmds.is_empty());
}

#[test]
fn allow_and_cmd_repeat() {
    let cli = cli(
        &["-a", "relative", "--allow", "var-relative", "-c", "git", "--cmd", "curl"],
        &[Path::new("x.sh")],
    );
    assert_eq!(cli.allow, vec![AllowArg::Relative, AllowArg::VarRelative]);
    assert_eq!(cli.cmds, vec!["git", "curl"]);
}

#[rstest]
#[case(&["shgate"])]
#[case(&["shgate", "-a", "sometimes", "x.sh"])]
#[case(&["shgate", "--format", "xml", "x.sh"])]
fn invalid_arguments_rejected(#[case] argv: &[&str]) {
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn long_help_lists_builtins() {
    let text = long_about();
    assert!(text.starts_with("Verifies shell script requirements"));
    assert!(text.contains("\n  . : [ admin"));
    assert!(text.trim_end().ends_with("yacc"));
}

// ============================================================================
// Policy merging
// ============================================================================

#[test]
fn config_and_cli_merge() {
    let config = Config {
        allow: vec!["relative".into()],
        commands: vec!["git".into()],
    };
    let cli = cli(&["-a", "var-relative", "-c", "curl"], &[Path::new("x.sh")]);
    let policy = build_policy(&config, &cli).unwrap();

    assert!(policy.is_known("git"));
    assert!(policy.is_known("curl"));
    assert!(policy.is_exempt("./x"));
    assert!(policy.is_exempt("$X"));
}

#[test]
fn allow_none_clears_config_features() {
    let config = Config {
        allow: vec!["relative".into()],
        commands: vec![],
    };
    let cli = cli(&["-a", "none"], &[Path::new("x.sh")]);
    let policy = build_policy(&config, &cli).unwrap();
    assert!(!policy.is_exempt("./x"));
}

#[test]
fn bad_config_feature_is_an_error() {
    let config = Config {
        allow: vec!["sometimes".into()],
        commands: vec![],
    };
    let cli = cli(&[], &[Path::new("x.sh")]);
    let err = build_policy(&config, &cli).unwrap_err();
    assert!(format!("{err:#}").contains("sometimes"));
}

// ============================================================================
// Checking scripts
// ============================================================================

#[test]
fn clean_script_exits_zero() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "ok.sh", "#!/bin/sh\necho hi | grep h\n");
    let report = run_check(&cli(&[], &[script.as_path()]));
    assert!(report.is_clean());
    assert_eq!(report.exit_status(), 0);
}

#[test]
fn unknown_commands_reported_relative_to_cwd() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "fetch.sh", "curl -s x\necho ok\nwget y\n");
    let report = run_check(&cli(&[], &[script.as_path()]));

    assert_eq!(report.exit_status(), 2);
    assert_eq!(
        render(&report, dir.path()),
        "fetch.sh:1:1: unsupported external command: curl\n\
         fetch.sh:3:1: unsupported external command: wget\n"
    );
}

#[test]
fn parse_failure_does_not_stop_other_scripts() {
    let dir = TempDir::new().unwrap();
    let broken = write_script(&dir, "a_broken.sh", "if true; then\n  echo hi\n");
    let good = write_script(&dir, "b_good.sh", "rsync -a src/ dst/\n");
    let report = run_check(&cli(&[], &[broken.as_path(), good.as_path()]));

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.starts_with("parse error: "));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].command, "rsync");
    assert_eq!(report.exit_status(), 2);

    let text = render(&report, dir.path());
    assert!(text.starts_with("a_broken.sh: parse error: "), "{text}");
    assert!(text.ends_with("b_good.sh:1:1: unsupported external command: rsync\n"));
}

#[test]
fn missing_script_is_a_failure() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.sh");
    let report = run_check(&cli(&[], &[missing.as_path()]));
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].message.contains("could not read script"));
}

#[test]
fn config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let config = write_script(&dir, "shgate.toml", "allow = [\"relative\"]\ncommands = [\"git\"]\n");
    let script = write_script(&dir, "ci.sh", "git fetch\n./scripts/test.sh\nmake\n");
    let config_arg = config.display().to_string();
    let report = run_check(&cli(&["--config", &config_arg], &[script.as_path()]));
    assert!(report.is_clean(), "{report:?}");
}

#[test]
fn invalid_config_file_aborts() {
    let dir = TempDir::new().unwrap();
    let config = write_script(&dir, "shgate.toml", "unknown = true\n");
    let script = write_script(&dir, "ci.sh", "true\n");
    let config_arg = config.display().to_string();
    let mut trees = Vec::new();
    assert!(check(&cli(&["--config", &config_arg], &[script.as_path()]), &mut trees).is_err());
}

#[test]
fn dump_tree_writes_sexpr() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "t.sh", "f() { ls; }\nf\n");
    let mut trees = Vec::new();
    check(&cli(&["--dump-tree"], &[script.as_path()]), &mut trees).unwrap();
    assert_eq!(
        String::from_utf8(trees).unwrap(),
        "(script\n  (func f (call \"ls\"))\n  (call \"f\"))\n"
    );
}

#[test]
fn json_output() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "j.sh", "\n  jq .x\n");
    let report = run_check(&cli(&["--format", "json"], &[script.as_path()]));

    let mut out = Vec::new();
    report.write_json(&mut out, dir.path()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value["issues"][0]["path"], "j.sh");
    assert_eq!(value["issues"][0]["command"], "jq");
    assert_eq!(value["issues"][0]["position"]["line"], 2);
    assert_eq!(value["issues"][0]["position"]["column"], 3);
    assert_eq!(value["failures"], serde_json::json!([]));
}
