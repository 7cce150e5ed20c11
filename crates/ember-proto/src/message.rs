//! Client line tokenizing and outbound message construction.
//!
//! Inbound lines are split on runs of spaces. A token starting with `:`
//! swallows the rest of the line verbatim (embedded spaces included) and
//! becomes the final token, with the colon removed. An empty trailing
//! parameter (`PRIVMSG bob :`) is kept as an empty token.

use std::fmt;

use crate::response::Response;

#[inline]
fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split a raw line into its ordered tokens.
///
/// A leading `:source` prefix, which clients are allowed to send, is
/// discarded so that the first token is always the verb.
///
/// ```
/// use ember_proto::tokenize;
///
/// assert_eq!(tokenize("USER bob 0 *  :Bob  Smith"), vec!["USER", "bob", "0", "*", "Bob  Smith"]);
/// assert_eq!(tokenize("PRIVMSG bob :"), vec!["PRIVMSG", "bob", ""]);
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start_matches(is_separator);

    if rest.starts_with(':') {
        let end = rest.find(is_separator).unwrap_or(rest.len());
        rest = rest[end..].trim_start_matches(is_separator);
    }

    while !rest.is_empty() {
        if let Some(trailing) = rest.strip_prefix(':') {
            tokens.push(trailing);
            break;
        }
        let end = rest.find(is_separator).unwrap_or(rest.len());
        tokens.push(&rest[..end]);
        rest = rest[end..].trim_start_matches(is_separator);
    }

    tokens
}

/// A tokenized client line borrowing from the raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> MessageRef<'a> {
    /// Tokenize a raw line.
    pub fn parse(line: &'a str) -> Self {
        Self {
            tokens: tokenize(line),
        }
    }

    /// True when the line held no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The verb as sent by the client (case preserved).
    pub fn command_name(&self) -> &'a str {
        self.tokens.first().copied().unwrap_or("")
    }

    /// Parameter `index`, counting from the first token after the verb.
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index + 1).copied()
    }

    /// All parameters after the verb.
    pub fn args(&self) -> &[&'a str] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    /// Number of parameters after the verb.
    pub fn arg_count(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }
}

/// An outbound protocol line.
///
/// Serializes as `:<prefix> <command> <params...> :<trailing>`, with the
/// prefix and trailing parts only present when set. The trailing part is
/// always written with its colon, even when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Optional source prefix (server name or `nick!user@host`).
    pub prefix: Option<String>,
    /// Verb or three-digit numeric.
    pub command: String,
    /// Middle parameters.
    pub params: Vec<String>,
    /// Final parameter written after ` :`.
    pub trailing: Option<String>,
}

impl Message {
    /// Create a message with no prefix or parameters.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params: Vec::new(),
            trailing: None,
        }
    }

    /// Create a numeric reply `:<server> <code> <target>`.
    pub fn numeric(server: &str, response: Response, target: &str) -> Self {
        Self::new(response.to_string())
            .with_prefix(server)
            .with_param(target)
    }

    /// Create `ERROR :<text>`.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new("ERROR").with_trailing(text)
    }

    /// Set the source prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append one middle parameter.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Append several middle parameters.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Set the trailing parameter.
    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = Some(trailing.into());
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{} ", prefix)?;
        }
        f.write_str(&self.command)?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        if let Some(trailing) = &self.trailing {
            write!(f, " :{}", trailing)?;
        }
        Ok(())
    }
}

impl From<Message> for String {
    fn from(msg: Message) -> Self {
        msg.to_string()
    }
}
