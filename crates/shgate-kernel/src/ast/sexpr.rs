//! S-expression formatter for scripts.
//!
//! Compact, diffable output for fixture tests and `--dump-tree`:
//!
//! ```text
//! (script
//!   (func build (call "make" "all"))
//!   (call "echo" "$(date)" (call "date")))
//! ```
//!
//! `Other` nodes are transparent: their children are printed in place.

use super::types::{CallExpr, FuncDecl, Node, Script};

/// Format a whole script, one top-level node per line.
pub fn format_script(script: &Script) -> String {
    let mut items = Vec::new();
    flatten(&script.body, &mut items);
    if items.is_empty() {
        return "(script)".to_string();
    }
    let mut out = String::from("(script");
    for item in items {
        out.push_str("\n  ");
        out.push_str(&item);
    }
    out.push(')');
    out
}

/// Format a single node. An `Other` node formats as its children joined by spaces.
pub fn format_node(node: &Node) -> String {
    match node {
        Node::FuncDecl(decl) => format_func(decl),
        Node::Call(call) => format_call(call),
        Node::Other(children) => {
            let mut items = Vec::new();
            flatten(children, &mut items);
            items.join(" ")
        }
    }
}

fn flatten(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Other(children) => flatten(children, out),
            other => out.push(format_node(other)),
        }
    }
}

fn format_func(decl: &FuncDecl) -> String {
    let mut items = Vec::new();
    flatten(&decl.body, &mut items);
    let mut out = format!("(func {}", decl.name);
    for item in items {
        out.push(' ');
        out.push_str(&item);
    }
    out.push(')');
    out
}

fn format_call(call: &CallExpr) -> String {
    let mut out = String::from("(call");
    for word in &call.args {
        out.push(' ');
        out.push_str(&format!("{:?}", word.render()));
    }
    let mut nested = Vec::new();
    flatten(&call.nested, &mut nested);
    for item in nested {
        out.push(' ');
        out.push_str(&item);
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Word, WordPart};
    use shgate_types::Position;

    #[test]
    fn empty_script() {
        assert_eq!(format_script(&Script::new("x.sh", vec![])), "(script)");
    }

    #[test]
    fn nested_structure() {
        let date = Node::Call(CallExpr {
            position: Position::new(2, 8),
            args: vec![Word::literal("date")],
            nested: vec![],
        });
        let echo = Node::Call(CallExpr {
            position: Position::new(2, 1),
            args: vec![
                Word::literal("echo"),
                Word::new(vec![WordPart::DoubleQuoted("$(date)".into())]),
            ],
            nested: vec![Node::Other(vec![date])],
        });
        let func = Node::FuncDecl(FuncDecl {
            name: "build".into(),
            position: Position::new(1, 1),
            body: vec![Node::Other(vec![Node::Call(CallExpr {
                position: Position::new(1, 12),
                args: vec![Word::literal("make")],
                nested: vec![],
            })])],
        });
        let script = Script::new("x.sh", vec![func, echo]);

        assert_eq!(
            format_script(&script),
            "(script\n  (func build (call \"make\"))\n  (call \"echo\" \"\\\"$(date)\\\"\" (call \"date\")))"
        );
    }
}
