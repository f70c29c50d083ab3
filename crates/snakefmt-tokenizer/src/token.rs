//! Token types for the snakefile tokenizer.

use crate::Span;

/// The kind of a token.
///
/// Mirrors the token classes of the host scripting language: logical line
/// ends and indentation changes are tokens of their own, horizontal
/// whitespace is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier or keyword: `rule`, `input`, `sample_1`
    Name,
    /// Operator or delimiter: `:`, `=`, `(`, `**=`
    Op,
    /// Numeric literal: `3`, `0x1f`, `1.5e-3`
    Number,
    /// String literal, prefix and quotes included: `"a.txt"`, `r'''x'''`
    String,
    /// Comment from `#` to the end of the line (line break excluded)
    Comment,
    /// End of a logical line
    Newline,
    /// Line break that does not end a logical line: blank lines,
    /// comment-only lines, breaks inside brackets
    Nl,
    /// Indentation increased; the text is the leading whitespace
    Indent,
    /// Indentation decreased; the text is empty
    Dedent,
    /// End of input
    EndMarker,
    /// Unrecognized input, unterminated string or inconsistent dedent
    Error,
}

/// A token with its kind, position, and source text slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
    /// 1-based line on which the token starts.
    pub line: u32,
    /// 0-based byte column at which the token starts.
    pub column: u32,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str, line: u32, column: u32) -> Self {
        Self {
            kind,
            span,
            text,
            line,
            column,
        }
    }
}
