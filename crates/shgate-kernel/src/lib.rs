//! shgate-kernel (核): the core of shgate.
//!
//! This crate provides:
//!
//! - **AST**: a closed syntax model of the parts of a shell script that
//!   matter for command checking (function declarations, call expressions)
//! - **Parser**: lowers a tree-sitter bash tree into that model
//! - **Quoting**: best-effort double-quote removal for command names
//! - **Policy**: the allow-list registry (builtins, extras, exemptions)
//! - **Analyzer**: the two-pass walk that reports disallowed commands
//!
//! ```ignore
//! use shgate_kernel::{analyze, parse, PolicyRegistry};
//!
//! let script = parse("curl example.com\n", "fetch.sh")?;
//! let policy = PolicyRegistry::builder().build();
//! for issue in analyze(&script, &policy) {
//!     eprintln!("{issue}");
//! }
//! ```

pub mod analyzer;
pub mod ast;
pub mod parser;
pub mod policy;
pub mod quoting;

pub use analyzer::{analyze, Analyzer, Classification, LocalFunctions};
pub use ast::Script;
pub use parser::{parse, ParseError};
pub use policy::{builtin_commands, format_builtins, PolicyRegistry, PolicyRegistryBuilder};
pub use shgate_types::{Feature, FeatureParseError, Issue, Position};
