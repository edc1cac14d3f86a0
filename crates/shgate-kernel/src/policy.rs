//! Allow-list policy: which command names a script may invoke.
//!
//! A [`PolicyRegistry`] is built once from the compiled-in builtin names, any
//! operator-supplied extra commands, and the enabled [`Feature`]s. After
//! `build()` it is read-only, so one registry can be shared by every
//! analysis, including analyses running on other threads.

use std::collections::{BTreeSet, HashSet};

use shgate_types::Feature;

/// POSIX utilities (<http://pubs.opengroup.org/onlinepubs/9699919799/idx/utilities.html>),
/// bash builtins, and `bash` itself. Contains duplicates; the registry is a set.
const BUILTIN_COMMANDS: &[&str] = &[
    // POSIX utilities
    "admin", "alias", "ar", "asa", "at", "awk", "basename", "batch", "bc", "bg", "c99",
    "cal", "cat", "cd", "cflow", "chgrp", "chmod", "chown", "cksum", "cmp", "comm", "command",
    "compress", "cp", "crontab", "csplit", "ctags", "cut", "cxref", "date", "dd", "delta", "df",
    "diff", "dirname", "du", "echo", "ed", "env", "ex", "expand", "expr", "false", "fc",
    "fg", "file", "find", "fold", "fort77", "fuser", "gencat", "get", "getconf", "getopts", "grep",
    "hash", "head", "iconv", "id", "ipcrm", "ipcs", "jobs", "join", "kill", "lex", "link",
    "ln", "locale", "localedef", "logger", "logname", "lp", "ls", "m4", "mailx", "make", "man",
    "mesg", "mkdir", "mkfifo", "more", "mv", "newgrp", "nice", "nl", "nm", "nohup", "od",
    "paste", "patch", "pathchk", "pax", "pr", "printf", "prs", "ps", "pwd", "qalter", "qdel",
    "qhold", "qmove", "qmsg", "qrerun", "qrls", "qselect", "qsig", "qstat", "qsub", "read", "renice",
    "rm", "rmdel", "rmdir", "sact", "sccs", "sed", "sh", "sleep", "sort", "split", "strings",
    "strip", "stty", "tabs", "tail", "talk", "tee", "test", "time", "touch", "tput", "tr",
    "true", "tsort", "tty", "type", "ulimit", "umask", "unalias", "uname", "uncompress", "unexpand", "unget",
    "uniq", "unlink", "uucp", "uudecode", "uuencode", "uustat", "uux", "val", "vi", "wait", "wc",
    "what", "who", "write", "xargs", "yacc",
    // Bash builtins
    ":", ".", "[", "alias", "bg", "bind", "break", "builtin", "case", "cd", "command", "compgen",
    "complete", "continue", "declare", "dirs", "disown", "echo", "enable",
    "eval", "exec", "exit", "export", "fc", "fg", "getopts", "hash", "help",
    "history", "if", "jobs", "kill", "let", "local", "logout", "popd", "printf",
    "pushd", "pwd", "read", "readonly", "return", "set", "shift", "shopt",
    "source", "suspend", "test", "times", "trap", "type", "typeset", "ulimit",
    "umask", "unalias", "unset", "until", "wait", "while",
    // Other
    "bash",
];

/// The compiled-in command names, in declaration order (with duplicates).
pub fn builtin_commands() -> &'static [&'static str] {
    BUILTIN_COMMANDS
}

/// Sorted, de-duplicated builtin names wrapped to lines of at most `max_width`
/// columns. A name longer than `max_width` gets a line of its own.
pub fn format_builtins(max_width: usize) -> String {
    let names: BTreeSet<&str> = BUILTIN_COMMANDS.iter().copied().collect();

    let mut out = String::new();
    let mut width = 0;
    for name in names {
        if width > 0 && width + 1 + name.len() > max_width {
            out.push('\n');
            width = 0;
        }
        if width > 0 {
            out.push(' ');
            width += 1;
        }
        out.push_str(name);
        width += name.len();
    }
    out
}

/// The allow list plus the enabled exemption rules.
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    known: HashSet<String>,
    features: HashSet<Feature>,
}

impl PolicyRegistry {
    /// Start a registry seeded with the builtin command names.
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::new()
    }

    /// True iff `name` is a builtin or an extra command. Exact, case-sensitive.
    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// True iff an enabled feature exempts `name` from the allow list.
    pub fn is_exempt(&self, name: &str) -> bool {
        if self.has_feature(Feature::VarRelative) && name.starts_with('$') {
            return true;
        }
        self.has_feature(Feature::Relative) && !name.starts_with('/') && name.contains('/')
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Enabled features, sorted.
    pub fn features(&self) -> Vec<Feature> {
        let mut features: Vec<_> = self.features.iter().copied().collect();
        features.sort();
        features
    }

    /// Number of distinct known command names.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`PolicyRegistry`]; the only place the allow list can change.
#[derive(Debug, Clone)]
pub struct PolicyRegistryBuilder {
    known: HashSet<String>,
    features: HashSet<Feature>,
}

impl Default for PolicyRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyRegistryBuilder {
    pub fn new() -> Self {
        Self {
            known: BUILTIN_COMMANDS.iter().map(|s| s.to_string()).collect(),
            features: HashSet::new(),
        }
    }

    /// Allow one extra command name.
    pub fn command(mut self, name: impl Into<String>) -> Self {
        self.known.insert(name.into());
        self
    }

    /// Allow several extra command names.
    pub fn commands<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known.extend(names.into_iter().map(Into::into));
        self
    }

    /// Enable an exemption rule.
    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Enable several exemption rules.
    pub fn features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }

    /// Disable every exemption rule enabled so far (`--allow none`).
    pub fn clear_features(mut self) -> Self {
        self.features.clear();
        self
    }

    pub fn build(self) -> PolicyRegistry {
        PolicyRegistry {
            known: self.known,
            features: self.features,
        }
    }
}
