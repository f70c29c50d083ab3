//! Tokenizer for snakefiles.

use std::collections::VecDeque;

use crate::{Span, Token, TokenKind};
use tracing::trace;

/// Columns per tab stop when measuring indentation.
const TAB_SIZE: usize = 8;

const THREE_CHAR_OPS: &[&str] = &["**=", "//=", ">>=", "<<=", "..."];

const TWO_CHAR_OPS: &[&str] = &[
    "**", "//", "<<", ">>", "<=", ">=", "==", "!=", "->", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "@=", ":=",
];

const ONE_CHAR_OPS: &str = "()[]{}:,;.+-*/%&|^~<>=@!";

/// A tokenizer that produces tokens from snakefile source text.
///
/// The stream always ends with an [`TokenKind::EndMarker`] token, after
/// which the iterator is exhausted.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Current 1-based line.
    line: u32,
    /// Byte offset where the current line starts.
    line_start: u32,

    /// Widths of the open indentation levels, innermost last.
    indents: Vec<usize>,
    /// Nesting of `()`, `[]` and `{}`; line breaks inside are not logical.
    bracket_depth: u32,
    /// Whether indentation of the next line still has to be measured.
    at_line_start: bool,
    /// Whether the current logical line carries anything but comments.
    line_has_code: bool,

    /// Tokens produced ahead of time (dedents, end of input).
    pending: VecDeque<Token<'src>>,
    finished: bool,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            line: 1,
            line_start: 0,
            indents: vec![0],
            bracket_depth: 0,
            at_line_start: true,
            line_has_code: false,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Advance by n bytes.
    #[inline]
    fn advance_by(&mut self, n: usize) {
        self.pos += n as u32;
        self.remaining = &self.remaining[n..];
    }

    /// Record that a physical line break was consumed.
    #[inline]
    fn bump_line(&mut self) {
        self.line += 1;
        self.line_start = self.pos;
    }

    #[inline]
    fn current_indent(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let column = start.saturating_sub(self.line_start);
        self.token_at(kind, start, self.line, column)
    }

    /// Create a token that started on an earlier line (multi-line strings).
    fn token_at(&self, kind: TokenKind, start: u32, line: u32, column: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at L{}:{} {:?}", kind, line, column, text);
        Token::new(kind, span, text, line, column)
    }

    /// Get the next token, or `None` once the end marker has been produced.
    pub fn next_token(&mut self) -> Option<Token<'src>> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.finished {
            return None;
        }

        if self.at_line_start
            && self.bracket_depth == 0
            && let Some(token) = self.tokenize_indentation()
        {
            return Some(token);
        }

        self.skip_horizontal_space();

        let start = self.pos;
        let Some(c) = self.peek() else {
            return self.finish();
        };

        let token = match c {
            '#' => self.tokenize_comment(),
            '\n' => {
                self.advance();
                self.tokenize_line_break(start)
            }
            '\r' => {
                self.advance();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                self.tokenize_line_break(start)
            }
            _ => {
                if let Some(prefix_len) = string_prefix_len(self.remaining) {
                    self.tokenize_string(prefix_len)
                } else if c.is_ascii_digit()
                    || (c == '.' && matches!(self.peek_nth(1), Some(d) if d.is_ascii_digit()))
                {
                    self.tokenize_number()
                } else if is_name_start(c) {
                    self.tokenize_name()
                } else {
                    self.tokenize_operator()
                }
            }
        };

        if !matches!(
            token.kind,
            TokenKind::Comment | TokenKind::Newline | TokenKind::Nl
        ) {
            self.line_has_code = true;
        }
        Some(token)
    }

    /// Measure the indentation of a new logical line.
    ///
    /// Blank and comment-only lines leave the indentation stack untouched.
    fn tokenize_indentation(&mut self) -> Option<Token<'src>> {
        let start = self.pos;
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / TAB_SIZE + 1) * TAB_SIZE,
                '\x0c' => width = 0,
                _ => break,
            }
            self.advance();
        }

        if matches!(self.peek(), None | Some('\n' | '\r' | '#')) {
            return None;
        }
        self.at_line_start = false;

        if width > self.current_indent() {
            self.indents.push(width);
            return Some(self.token(TokenKind::Indent, start));
        }

        while width < self.current_indent() {
            self.indents.pop();
            let dedent = self.token(TokenKind::Dedent, self.pos);
            self.pending.push_back(dedent);
        }
        if width != self.current_indent() {
            // unindent does not match any outer level
            let error = self.token(TokenKind::Error, start);
            self.pending.push_back(error);
        }
        self.pending.pop_front()
    }

    /// Skip spaces, tabs and backslash line continuations.
    fn skip_horizontal_space(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\x0c') => {
                    self.advance();
                }
                Some('\\') if self.peek_nth(1) == Some('\n') => {
                    self.advance_by(2);
                    self.bump_line();
                }
                Some('\\') if self.remaining.starts_with("\\\r\n") => {
                    self.advance_by(3);
                    self.bump_line();
                }
                _ => break,
            }
        }
    }

    /// Produce the trailing newline, dedents and end marker.
    fn finish(&mut self) -> Option<Token<'src>> {
        if self.line_has_code {
            self.line_has_code = false;
            let newline = self.token(TokenKind::Newline, self.pos);
            self.pending.push_back(newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            let dedent = self.token(TokenKind::Dedent, self.pos);
            self.pending.push_back(dedent);
        }
        let end = self.token(TokenKind::EndMarker, self.pos);
        self.pending.push_back(end);
        self.finished = true;
        self.pending.pop_front()
    }

    /// Tokenize a line break (already consumed).
    fn tokenize_line_break(&mut self, start: u32) -> Token<'src> {
        let kind = if self.bracket_depth > 0 || !self.line_has_code {
            TokenKind::Nl
        } else {
            TokenKind::Newline
        };
        let token = self.token(kind, start);
        self.bump_line();
        if self.bracket_depth == 0 {
            self.at_line_start = true;
            self.line_has_code = false;
        }
        token
    }

    /// Tokenize a comment: `# ...`.
    fn tokenize_comment(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.advance();
        }
        self.token(TokenKind::Comment, start)
    }

    /// Tokenize a string literal, including its prefix letters.
    fn tokenize_string(&mut self, prefix_len: usize) -> Token<'src> {
        let start = self.pos;
        let (line, column) = (self.line, start - self.line_start);
        self.advance_by(prefix_len);

        let triple = self.remaining.starts_with("\"\"\"") || self.remaining.starts_with("'''");
        let delimiter = match (self.peek(), triple) {
            (Some('"'), true) => "\"\"\"",
            (Some('"'), false) => "\"",
            (_, true) => "'''",
            (_, false) => "'",
        };
        self.advance_by(delimiter.len());

        loop {
            if self.remaining.starts_with(delimiter) {
                self.advance_by(delimiter.len());
                return self.token_at(TokenKind::String, start, line, column);
            }
            match self.peek() {
                None => return self.token_at(TokenKind::Error, start, line, column),
                Some('\\') => {
                    self.advance();
                    if self.advance() == Some('\n') {
                        self.bump_line();
                    }
                }
                Some('\n') if !triple => {
                    return self.token_at(TokenKind::Error, start, line, column);
                }
                Some('\n') => {
                    self.advance();
                    self.bump_line();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Tokenize a numeric literal.
    fn tokenize_number(&mut self) -> Token<'src> {
        let start = self.pos;
        let hex = matches!(self.remaining.get(..2), Some("0x" | "0X"));
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                break;
            }
            self.advance();
            if !hex && matches!(c, 'e' | 'E') && matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
        }
        self.token(TokenKind::Number, start)
    }

    /// Tokenize an identifier.
    fn tokenize_name(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Name, start)
    }

    /// Tokenize an operator or delimiter, longest match first.
    fn tokenize_operator(&mut self) -> Token<'src> {
        let start = self.pos;
        if let Some(op) = THREE_CHAR_OPS
            .iter()
            .chain(TWO_CHAR_OPS)
            .find(|op| self.remaining.starts_with(**op))
        {
            self.advance_by(op.len());
            return self.token(TokenKind::Op, start);
        }

        let Some(c) = self.advance() else {
            return self.token(TokenKind::Error, start);
        };
        if !ONE_CHAR_OPS.contains(c) {
            return self.token(TokenKind::Error, start);
        }
        match c {
            '(' | '[' | '{' => self.bracket_depth += 1,
            ')' | ']' | '}' => self.bracket_depth = self.bracket_depth.saturating_sub(1),
            _ => {}
        }
        self.token(TokenKind::Op, start)
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Length of the string prefix (`r`, `b`, `f`, `rb`, ...) if `rest` starts
/// a string literal.
fn string_prefix_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut len = 0;
    while len < 2
        && bytes
            .get(len)
            .is_some_and(|b| matches!(b.to_ascii_lowercase(), b'r' | b'b' | b'u' | b'f'))
    {
        len += 1;
    }
    match bytes.get(len) {
        Some(b'"' | b'\'') => Some(len),
        _ => None,
    }
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
