//! Errors raised while parsing keyword blocks and parameter lists.

use std::fmt;

use snakefmt_tokenizer::{Span, Token};

/// What went wrong. Every kind is a malformed-input condition; none is used
/// for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// A nameable keyword was followed by something other than a name.
    NamedKeyword,
    /// Missing colon after a keyword, or missing newline after a header.
    Syntax,
    /// The same child keyword appears twice in one block.
    DuplicateKeyword,
    /// A block closed without any child keyword.
    EmptyContext,
    /// Malformed `key = value`, or a keyword swallowed as a value.
    InvalidParameterSyntax,
    /// A parameter list ended without any parameter.
    NoParameters,
    /// A single-parameter keyword got more than one.
    TooManyParameters,
    /// A single-parameter keyword got a `key = value` parameter.
    InvalidParameter,
    /// A word the enclosing block neither recognises nor accepts as code.
    UnrecognisedKeyword,
    /// The token source ran dry where a token is mandatory.
    UnexpectedEof,
    /// The tokenizer could not make sense of the input: an unterminated
    /// string, a dedent to no known level, a stray character.
    InvalidToken,
}

/// A parse error with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// The kind of error.
    pub kind: SyntaxErrorKind,
    /// 1-based line of the offending token.
    pub line: u32,
    /// Span of the offending token.
    pub span: Span,
    /// Human-readable description.
    pub message: String,
}

impl SyntaxError {
    /// Create an error located at `token`.
    pub fn new(kind: SyntaxErrorKind, token: &Token<'_>, message: impl Into<String>) -> Self {
        Self::at(kind, token.line, token.span, message)
    }

    /// Create an error for a token the tokenizer flagged as invalid.
    pub fn invalid_token(token: &Token<'_>) -> Self {
        let text = token.text;
        let message = if text.trim().is_empty() {
            "Unindent does not match any outer indentation level".to_string()
        } else if text
            .trim_start_matches(['r', 'R', 'b', 'B', 'u', 'U', 'f', 'F'])
            .starts_with(['"', '\''])
        {
            format!("Unterminated string literal {}", text)
        } else {
            format!("Invalid character '{}'", text)
        };
        Self::new(SyntaxErrorKind::InvalidToken, token, message)
    }

    /// Create an error at an explicit location.
    pub fn at(kind: SyntaxErrorKind, line: u32, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}: {}", self.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, SyntaxError>;
