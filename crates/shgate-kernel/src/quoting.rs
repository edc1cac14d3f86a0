//! Double-quote removal for command names.
//!
//! This is a known-limited heuristic, not a shell word expander. It handles
//! a command name written entirely inside one pair of double quotes
//! (`"grep"`, `"my tool"`). Anything else, such as `"foo"bar` or `"a"'b'`,
//! is rejected so the caller can fall back to the raw text.

use thiserror::Error;

/// Why a word could not be unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnquoteError {
    #[error("word does not start with a double quote")]
    NotQuoted,
    #[error("missing closing double quote")]
    Unterminated,
    #[error("text follows the closing double quote at byte {0}")]
    TrailingText(usize),
}

/// Remove one level of double quotes using POSIX double-quote rules.
///
/// Inside the quotes a backslash only escapes `$`, `` ` ``, `"`, `\` and
/// newline; a backslash-newline pair disappears entirely. Every other
/// backslash is kept as-is.
pub fn unquote_double(word: &str) -> Result<String, UnquoteError> {
    let inner = word.strip_prefix('"').ok_or(UnquoteError::NotQuoted)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, '\n')) => {}
                Some((_, escaped @ ('$' | '`' | '"' | '\\'))) => out.push(escaped),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(UnquoteError::Unterminated),
            },
            '"' => {
                // +1 for the opening quote stripped above
                let close = idx + 1;
                if close + 1 != word.len() {
                    return Err(UnquoteError::TrailingText(close + 1));
                }
                return Ok(out);
            }
            other => out.push(other),
        }
    }

    Err(UnquoteError::Unterminated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""grep""#, "grep")]
    #[case(r#""my tool""#, "my tool")]
    #[case(r#""""#, "")]
    #[case(r#""a\"b""#, "a\"b")]
    #[case(r#""\$HOME""#, "$HOME")]
    #[case(r#""back\\slash""#, "back\\slash")]
    #[case(r#""keep\n""#, "keep\\n")]
    #[case("\"line\\\ncontinued\"", "linecontinued")]
    #[case(r#""$TOOL""#, "$TOOL")]
    fn unquotes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unquote_double(input), Ok(expected.to_string()));
    }

    #[test]
    fn rejects_unquoted() {
        assert_eq!(unquote_double("grep"), Err(UnquoteError::NotQuoted));
        assert_eq!(unquote_double("'grep'"), Err(UnquoteError::NotQuoted));
    }

    #[test]
    fn rejects_unterminated() {
        assert_eq!(unquote_double("\""), Err(UnquoteError::Unterminated));
        assert_eq!(unquote_double(r#""grep"#), Err(UnquoteError::Unterminated));
        assert_eq!(unquote_double(r#""grep\""#), Err(UnquoteError::Unterminated));
        assert_eq!(unquote_double("\"grep\\"), Err(UnquoteError::Unterminated));
    }

    #[test]
    fn rejects_concatenation() {
        assert_eq!(
            unquote_double(r#""foo"bar"#),
            Err(UnquoteError::TrailingText(5))
        );
        assert!(unquote_double(r#""a"'b'"#).is_err());
        assert!(unquote_double(r#""a""b""#).is_err());
    }
}
