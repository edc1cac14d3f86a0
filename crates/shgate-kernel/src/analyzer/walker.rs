//! Two-pass walk that turns call expressions into issues.

use shgate_types::Issue;

use crate::ast::{walk, CallExpr, Node, Script, Word};
use crate::policy::PolicyRegistry;
use crate::quoting::unquote_double;

use super::functions::LocalFunctions;

/// How a command name was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// An enabled feature exempts it (`relative`, `var-relative`).
    Exempt,
    /// A builtin or extra command.
    Known,
    /// A function declared in the same script.
    LocalFunction,
    /// Not allowed; reported as an issue.
    Unsupported,
}

impl Classification {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Classification::Unsupported)
    }
}

/// Checks scripts against one policy.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'p> {
    policy: &'p PolicyRegistry,
}

impl<'p> Analyzer<'p> {
    pub fn new(policy: &'p PolicyRegistry) -> Self {
        Self { policy }
    }

    /// Report every call whose command the policy does not allow.
    ///
    /// Issues come out in document order. The same command at two call
    /// sites produces two issues.
    pub fn analyze(&self, script: &Script) -> Vec<Issue> {
        // Pass 1 must finish first: calls may precede the definition.
        let functions = LocalFunctions::collect(&script.body);

        let mut issues = Vec::new();
        walk(&script.body, &mut |node| {
            if let Node::Call(call) = node {
                if let Some(issue) = self.check_call(script, call, &functions) {
                    issues.push(issue);
                }
            }
        });

        tracing::debug!(
            script = %script.name,
            functions = functions.len(),
            issues = issues.len(),
            "analyzed script"
        );
        issues
    }

    fn check_call(
        &self,
        script: &Script,
        call: &CallExpr,
        functions: &LocalFunctions,
    ) -> Option<Issue> {
        let word = call.command_word()?;
        let name = resolve_command_name(word);
        let verdict = self.classify(&name, functions);
        tracing::trace!(
            script = %script.name,
            position = %call.position,
            command = %name,
            ?verdict,
            "classified call"
        );

        if verdict.is_allowed() {
            None
        } else {
            Some(Issue::new(script.name.as_str(), call.position, name))
        }
    }

    /// Exemptions win over the allow list, which wins over local functions.
    /// The order only matters for the reported classification; any of the
    /// three means "allowed".
    pub fn classify(&self, name: &str, functions: &LocalFunctions) -> Classification {
        if self.policy.is_exempt(name) {
            Classification::Exempt
        } else if self.policy.is_known(name) {
            Classification::Known
        } else if functions.contains(name) {
            Classification::LocalFunction
        } else {
            Classification::Unsupported
        }
    }
}

/// Analyze `script` against `policy`. See [`Analyzer::analyze`].
pub fn analyze(script: &Script, policy: &PolicyRegistry) -> Vec<Issue> {
    Analyzer::new(policy).analyze(script)
}

/// The command name a call word stands for.
///
/// A word that starts with a double quote is unquoted when it is a single
/// double-quoted string; otherwise the rendered text is used as-is.
pub fn resolve_command_name(word: &Word) -> String {
    let rendered = word.render();
    if !rendered.starts_with('"') {
        return rendered;
    }
    match unquote_double(&rendered) {
        Ok(unquoted) => unquoted,
        Err(e) => {
            tracing::debug!(word = %rendered, error = %e, "keeping command name quoted");
            rendered
        }
    }
}
