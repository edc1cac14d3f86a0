//! Parser front end for shell scripts.
//!
//! Runs the tree-sitter bash grammar over the source and lowers the concrete
//! syntax tree into the [`ast`](crate::ast) model. Only `function_definition`
//! and `command` nodes survive as themselves; every other node is kept as
//! [`Node::Other`] when something relevant is nested inside it and dropped
//! otherwise. `local`/`export`/`declare` (declaration commands), `unset` and
//! `[[ ... ]]` are not commands in this grammar, so they never become calls.
//!
//! The grammar has no `time` or `coproc` clause: `time curl x` comes back as
//! a command named `time` with `curl` as an argument. Those keywords are
//! blanked out of the source and the script is parsed again, so the wrapped
//! command or block is lowered as if the keyword were not there. Blanking
//! replaces bytes with spaces, so every position stays where it was.

use std::ops::Range;

use shgate_types::Position;
use thiserror::Error;
use tree_sitter::{Node as TsNode, Parser, Tree};

use crate::ast::{CallExpr, FuncDecl, Node, Script, Word, WordPart};

/// Parse failure. The analyzer never sees a script that failed to parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load bash grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
    #[error("parser gave up without producing a tree")]
    Aborted,
    #[error("{position}: {message}")]
    Syntax { position: Position, message: String },
}

impl ParseError {
    /// Source position of a syntax error, if there is one.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Parse shell source into a [`Script`] named `name`.
///
/// Any `ERROR` or `MISSING` node in the tree makes the whole parse fail,
/// reported at the first such node in document order.
pub fn parse(source: &str, name: &str) -> Result<Script, ParseError> {
    let (tree, text) = parse_tree(source)?;
    let root = tree.root_node();

    if root.has_error() {
        return Err(syntax_error(root, &text));
    }

    let lowering = Lowering { source: &text };
    let body = lowering.lower_children(root);
    tracing::debug!(script = %name, top_level = body.len(), "parsed script");
    Ok(Script::new(name, body))
}

/// Parse until no `time`/`coproc` keyword is left, returning the final tree
/// and the (blanked) text it was parsed from.
fn parse_tree(source: &str) -> Result<(Tree, String), ParseError> {
    let language: tree_sitter::Language = tree_sitter_bash::LANGUAGE.into();
    let mut parser = Parser::new();
    parser.set_language(&language)?;

    let mut text = source.to_string();
    loop {
        let tree = parser.parse(&text, None).ok_or(ParseError::Aborted)?;
        let mut spans = Vec::new();
        keyword_spans(tree.root_node(), &text, &mut spans);
        if spans.is_empty() {
            return Ok((tree, text));
        }
        tracing::trace!(keywords = spans.len(), "blanking clause keywords");
        for span in spans {
            let blank = " ".repeat(span.len());
            text.replace_range(span, &blank);
        }
    }
}

fn keyword_spans(node: TsNode<'_>, source: &str, spans: &mut Vec<Range<usize>>) {
    if node.kind() == "command" {
        spans.extend(clause_keyword(node, source));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        keyword_spans(child, source, spans);
    }
}

/// Byte ranges of a leading `time [-p]` or `coproc [NAME {]` in `command`.
fn clause_keyword(command: TsNode<'_>, source: &str) -> Vec<Range<usize>> {
    let Some(name) = command.child_by_field_name("name") else {
        return Vec::new();
    };
    // After an assignment or redirect `time` is the utility, not the keyword.
    if name.start_byte() != command.start_byte() {
        return Vec::new();
    }

    let mut cursor = command.walk();
    let args: Vec<TsNode<'_>> = command
        .children_by_field_name("argument", &mut cursor)
        .collect();

    let mut spans = vec![name.byte_range()];
    match node_text(name, source) {
        "time" => {
            if let Some(flag) = args.first() {
                if node_text(*flag, source) == "-p" {
                    spans.push(flag.byte_range());
                }
            }
        }
        "coproc" => {
            if let [coproc_name, open, ..] = args.as_slice() {
                if coproc_name.kind() == "word" && node_text(*open, source) == "{" {
                    spans.push(coproc_name.byte_range());
                }
            }
        }
        _ => return Vec::new(),
    }
    spans
}

fn node_text<'s>(node: TsNode<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

fn position_of(node: TsNode<'_>) -> Position {
    let point = node.start_position();
    Position::new(point.row + 1, point.column + 1)
}

/// A command starts at its first assignment or word; leading redirects
/// belong to the statement.
fn call_position(command: TsNode<'_>) -> Position {
    let mut cursor = command.walk();
    let first = command
        .named_children(&mut cursor)
        .find(|child| !child.kind().ends_with("redirect"));
    position_of(first.unwrap_or(command))
}

fn syntax_error(root: TsNode<'_>, source: &str) -> ParseError {
    let Some(node) = find_error(root) else {
        return ParseError::Syntax {
            position: position_of(root),
            message: "syntax error".to_string(),
        };
    };

    let message = if node.is_missing() {
        format!("missing {:?}", node.kind())
    } else {
        let text = source.get(node.byte_range()).unwrap_or_default();
        let snippet: String = text
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(24)
            .collect();
        format!("syntax error near {:?}", snippet)
    };

    ParseError::Syntax {
        position: position_of(node),
        message,
    }
}

fn find_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error(child) {
            return Some(found);
        }
    }
    None
}

struct Lowering<'src> {
    source: &'src str,
}

impl<'src> Lowering<'src> {
    fn text(&self, node: TsNode<'_>) -> &'src str {
        node_text(node, self.source)
    }

    fn slice(&self, start: usize, end: usize) -> &'src str {
        self.source.get(start..end).unwrap_or_default()
    }

    fn lower_children(&self, node: TsNode<'_>) -> Vec<Node> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter_map(|child| self.lower(child))
            .collect()
    }

    fn lower(&self, node: TsNode<'_>) -> Option<Node> {
        match node.kind() {
            "function_definition" => self.lower_function(node),
            "command" => Some(Node::Call(self.lower_command(node))),
            _ => {
                let children = self.lower_children(node);
                if children.is_empty() {
                    None
                } else {
                    Some(Node::Other(children))
                }
            }
        }
    }

    fn lower_function(&self, node: TsNode<'_>) -> Option<Node> {
        let body = self.lower_children(node);
        match node.child_by_field_name("name") {
            Some(name) => Some(Node::FuncDecl(FuncDecl {
                name: self.text(name).to_string(),
                position: position_of(node),
                body,
            })),
            None if body.is_empty() => None,
            None => Some(Node::Other(body)),
        }
    }

    fn lower_command(&self, node: TsNode<'_>) -> CallExpr {
        let mut args = Vec::new();
        let mut nested = Vec::new();

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if child.is_named() {
                    if matches!(cursor.field_name(), Some("name" | "argument")) {
                        args.push(self.lower_word(child));
                    }
                    if let Some(lowered) = self.lower(child) {
                        nested.push(lowered);
                    }
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }

        CallExpr {
            position: call_position(node),
            args,
            nested,
        }
    }

    fn lower_word(&self, node: TsNode<'_>) -> Word {
        let mut parts = Vec::new();
        self.word_parts(node, &mut parts);
        Word::new(parts)
    }

    fn word_parts(&self, node: TsNode<'_>, parts: &mut Vec<WordPart>) {
        let text = self.text(node);
        match node.kind() {
            "command_name" | "concatenation" => {
                // Children need not cover every byte; gaps are literal text.
                let mut offset = node.start_byte();
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.start_byte() > offset {
                        let gap = self.slice(offset, child.start_byte());
                        parts.push(WordPart::Literal(gap.to_string()));
                    }
                    self.word_parts(child, parts);
                    offset = child.end_byte();
                }
                if offset < node.end_byte() {
                    let gap = self.slice(offset, node.end_byte());
                    parts.push(WordPart::Literal(gap.to_string()));
                }
            }
            "string" => parts.push(match strip_pair(text, '"') {
                Some(inner) => WordPart::DoubleQuoted(inner.to_string()),
                None => WordPart::Literal(text.to_string()),
            }),
            "raw_string" => parts.push(match strip_pair(text, '\'') {
                Some(inner) => WordPart::SingleQuoted(inner.to_string()),
                None => WordPart::Literal(text.to_string()),
            }),
            "simple_expansion" | "expansion" | "command_substitution" | "arithmetic_expansion"
            | "process_substitution" => parts.push(WordPart::Expansion(text.to_string())),
            _ => parts.push(WordPart::Literal(text.to_string())),
        }
    }
}

fn strip_pair(text: &str, quote: char) -> Option<&str> {
    text.strip_prefix(quote)?.strip_suffix(quote)
}
