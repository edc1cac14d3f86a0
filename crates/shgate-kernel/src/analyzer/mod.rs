//! Static analysis of the external commands a script invokes.
//!
//! The analyzer runs after parsing and never executes anything. For each
//! script it makes two passes over the tree:
//!
//! 1. **Local functions**: collect every function name declared anywhere in
//!    the script, so calls that come before the definition still resolve.
//! 2. **Classification**: resolve the command name of every call and check
//!    it against the [`PolicyRegistry`](crate::policy::PolicyRegistry).
//!
//! # Example
//!
//! ```ignore
//! use shgate_kernel::analyzer::Analyzer;
//! use shgate_kernel::parser::parse;
//!
//! let script = parse("curl -s example.com | jq .\n", "fetch.sh")?;
//! let issues = Analyzer::new(&policy).analyze(&script);
//!
//! for issue in &issues {
//!     eprintln!("{issue}");
//! }
//! ```

mod functions;
mod walker;

pub use functions::LocalFunctions;
pub use walker::{analyze, resolve_command_name, Analyzer, Classification};
