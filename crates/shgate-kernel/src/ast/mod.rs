//! Syntax model for shell scripts.
//!
//! This module provides:
//! - AST type definitions (`types` module, re-exported at this level)
//! - A deterministic pre-order walker (`walk`)
//! - S-expression formatter for test fixtures and `--dump-tree` (`sexpr` module)

mod types;
pub mod sexpr;

pub use types::*;
