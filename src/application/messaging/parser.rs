//! Command parser - Splits prefixed message text into a call and arguments

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// A double-quoted run, or a run of characters that are neither whitespace nor quotes
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]*)"|([^\s"]+)"#).expect("token pattern is valid")
});

/// Default command prefix
pub const DEFAULT_PREFIX: &str = "!";

/// Split text into tokens. Quoted runs keep their whitespace and lose their quotes.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A parsed command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub call: String,
    pub args: Vec<String>,
}

/// Recognises prefixed messages
#[derive(Debug, Clone)]
pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parse `text` as a command invocation.
    ///
    /// Returns `None` unless the text starts with the prefix and something
    /// follows it. The remainder after the prefix is tokenized; its first token
    /// is the call.
    pub fn parse(&self, text: &str) -> Option<Invocation> {
        let rest = text.strip_prefix(self.prefix.as_str())?;

        let mut tokens = tokenize(rest).into_iter();
        let call = tokens.next()?;

        Some(Invocation {
            call,
            args: tokens.collect(),
        })
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}
