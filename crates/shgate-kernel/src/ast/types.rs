//! AST types for shell scripts.
//!
//! The parser keeps only what command checking needs. Anything that is not a
//! function declaration or a call expression becomes [`Node::Other`], which
//! exists only to preserve nesting.

use shgate_types::Position;

/// A parsed script: its identifier plus top-level nodes in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// Identifier the script was parsed under, usually its path.
    pub name: String,
    pub body: Vec<Node>,
}

impl Script {
    pub fn new(name: impl Into<String>, body: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

/// A syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Function declaration: `name() { body }` or `function name { body }`
    FuncDecl(FuncDecl),
    /// Command invocation: `cmd arg1 arg2`
    Call(CallExpr),
    /// Any other construct (pipeline, list, if, loop, subshell, ...)
    Other(Vec<Node>),
}

impl Node {
    /// Nodes directly nested inside this one.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::FuncDecl(decl) => &decl.body,
            Node::Call(call) => &call.nested,
            Node::Other(children) => children,
        }
    }
}

/// Shell function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub position: Position,
    pub body: Vec<Node>,
}

/// A command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub position: Position,
    /// Command words; index 0 is the command name. Assignments and
    /// redirections are not words.
    pub args: Vec<Word>,
    /// Calls and functions nested inside the words or redirections,
    /// e.g. the `date` in `echo "$(date)"`.
    pub nested: Vec<Node>,
}

impl CallExpr {
    /// The command-name word, if the call has any words.
    pub fn command_word(&self) -> Option<&Word> {
        self.args.first()
    }
}

/// One shell word, possibly built from adjacent literal and quoted parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    pub fn new(parts: Vec<WordPart>) -> Self {
        Self { parts }
    }

    /// A word made of a single literal part.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            parts: vec![WordPart::Literal(text.into())],
        }
    }

    /// Reconstruct the word as it was written, quotes included.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            part.render_into(&mut out);
        }
        out
    }
}

/// A segment of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted text: `grep`, `./build.sh`
    Literal(String),
    /// Text inside single quotes, without the quotes
    SingleQuoted(String),
    /// Text inside double quotes, without the quotes, escapes untouched
    DoubleQuoted(String),
    /// Parameter, command or arithmetic expansion as written: `$X`, `${X}`, `$(cmd)`
    Expansion(String),
}

impl WordPart {
    fn render_into(&self, out: &mut String) {
        match self {
            WordPart::Literal(text) | WordPart::Expansion(text) => out.push_str(text),
            WordPart::SingleQuoted(text) => {
                out.push('\'');
                out.push_str(text);
                out.push('\'');
            }
            WordPart::DoubleQuoted(text) => {
                out.push('"');
                out.push_str(text);
                out.push('"');
            }
        }
    }
}

/// Visit every node in pre-order, document order.
///
/// A function's body and a call's nested nodes are visited right after the
/// function or call itself.
pub fn walk<'a, F>(nodes: &'a [Node], visit: &mut F)
where
    F: FnMut(&'a Node),
{
    for node in nodes {
        visit(node);
        walk(node.children(), visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(line: usize, name: &str, nested: Vec<Node>) -> Node {
        Node::Call(CallExpr {
            position: Position::new(line, 1),
            args: vec![Word::literal(name)],
            nested,
        })
    }

    #[test]
    fn render_concatenated_parts() {
        let word = Word::new(vec![
            WordPart::Literal("foo".into()),
            WordPart::DoubleQuoted("bar baz".into()),
            WordPart::SingleQuoted("$x".into()),
            WordPart::Expansion("${Y}".into()),
        ]);
        assert_eq!(word.render(), r#"foo"bar baz"'$x'${Y}"#);
    }

    #[test]
    fn render_quoted_command() {
        let word = Word::new(vec![WordPart::DoubleQuoted("grep".into())]);
        assert_eq!(word.render(), "\"grep\"");
    }

    #[test]
    fn walk_is_preorder() {
        let body = vec![
            call(1, "a", vec![call(1, "b", vec![])]),
            Node::Other(vec![
                Node::FuncDecl(FuncDecl {
                    name: "f".into(),
                    position: Position::new(2, 1),
                    body: vec![call(3, "c", vec![])],
                }),
                call(5, "d", vec![]),
            ]),
        ];

        let mut seen = Vec::new();
        walk(&body, &mut |node| match node {
            Node::Call(c) => seen.push(c.args[0].render()),
            Node::FuncDecl(f) => seen.push(format!("fn {}", f.name)),
            Node::Other(_) => seen.push("other".into()),
        });

        assert_eq!(seen, vec!["a", "b", "other", "fn f", "c", "d"]);
    }
}
