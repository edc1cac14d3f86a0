//! Local function tracking.
//!
//! Shell functions live in one global namespace once defined, so a single
//! flat set per script is enough. Unlike variable scopes there is no frame
//! stack: a function declared inside another function's body, or inside an
//! `if`, still counts as local.

use std::collections::HashSet;

use crate::ast::{walk, Node};

/// Names of the functions a script declares.
#[derive(Debug, Clone, Default)]
pub struct LocalFunctions {
    names: HashSet<String>,
}

impl LocalFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the entire tree and record every function declaration.
    pub fn collect(nodes: &[Node]) -> Self {
        let mut functions = Self::new();
        walk(nodes, &mut |node| {
            if let Node::FuncDecl(decl) = node {
                functions.declare(decl.name.as_str());
            }
        });
        functions
    }

    pub fn declare(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declared names, sorted (for debugging and logs).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.names.iter().map(String::as_str).collect();
        names.sort();
        names
    }
}
