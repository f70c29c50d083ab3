//! Keyword blocks: a header followed by an indented body of child keywords
//! or raw code.

use std::collections::HashSet;

use snakefmt_tokenizer::{Span, Token, TokenKind};

#[allow(unused_imports)]
use crate::{debug, trace};
use crate::classify::end_marker;
use crate::header::{Header, pull};
use crate::{Dialect, Result, SyntaxError, SyntaxErrorKind};

/// What [`KeywordBlock::next_queriable`] stopped on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status<'src> {
    /// The yielded name, or the end marker.
    pub token: Token<'src>,
    /// Depth at which `token` was found.
    pub depth: usize,
    /// Text skipped since the previous yield.
    pub buffer: String,
    /// Whether the input is exhausted.
    pub eof: bool,
}

/// A keyword block being read, e.g. `rule foo:` and its body.
#[derive(Debug)]
pub struct KeywordBlock<'src> {
    keyword: String,
    target: usize,
    depth: usize,
    /// Location of the last header token, for error reporting.
    line: u32,
    span: Span,
    comment: String,
    accepts_code: bool,
    processed: HashSet<String>,
    /// At most one token is yielded per logical line.
    queriable: bool,
    line_start: bool,
    end: Option<Token<'src>>,
}

impl<'src> KeywordBlock<'src> {
    /// The implicit block around a whole file.
    pub fn root(keyword: impl Into<String>, accepts_code: bool) -> Self {
        Self {
            keyword: keyword.into(),
            target: 0,
            depth: 0,
            line: 1,
            span: Span::default(),
            comment: String::new(),
            accepts_code,
            processed: HashSet::new(),
            queriable: true,
            line_start: true,
            end: None,
        }
    }

    /// Parse a block header and the rest of its line.
    ///
    /// The cursor must sit right after `keyword`; on success it sits at the
    /// start of the body. The block is registered on `parent` under its full
    /// identity.
    pub fn parse<I>(
        keyword: &Token<'src>,
        target: usize,
        parent: Option<&mut KeywordBlock<'_>>,
        dialect: &Dialect,
        tokens: &mut I,
    ) -> Result<Self>
    where
        I: Iterator<Item = Token<'src>>,
    {
        let header = Header::parse(keyword, target, dialect, tokens)?;

        if let Some(parent) = parent {
            parent.register_child_keyword(keyword, &header.keyword)?;
        }

        let mut comment = String::new();
        let mut token = pull(tokens, &header.token)?;
        if token.kind == TokenKind::Comment {
            comment = format!(" {}", token.text);
            token = pull(tokens, &token)?;
        }
        if token.kind != TokenKind::Newline {
            return Err(SyntaxError::new(
                SyntaxErrorKind::Syntax,
                &token,
                format!("Newline expected after keyword '{}'", header.keyword),
            ));
        }

        debug!("open block {:?} (target {})", header.keyword, target);
        Ok(Self {
            keyword: header.keyword,
            target,
            depth: header.depth,
            line: token.line,
            span: token.span,
            comment,
            accepts_code: dialect.accepts_code(keyword.text),
            processed: HashSet::new(),
            queriable: true,
            line_start: true,
            end: None,
        })
    }

    /// Keyword identity, e.g. `rule foo`.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Depth at which the header appears.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Current indentation depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Trailing comment of the header line, with a leading space, or empty.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Line of the header's last token.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Whether the body is raw code rather than child keywords.
    pub fn accepts_code(&self) -> bool {
        self.accepts_code
    }

    pub fn processed_keywords(&self) -> &HashSet<String> {
        &self.processed
    }

    /// Record that a child keyword was seen in the body.
    pub fn register_child_keyword(&mut self, token: &Token<'_>, identity: &str) -> Result<()> {
        if !self.processed.insert(identity.to_string()) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::DuplicateKeyword,
                token,
                format!("'{}' specified twice.", identity),
            ));
        }
        Ok(())
    }

    /// Fail if no child keyword was registered.
    pub fn check_empty(&self) -> Result<()> {
        if self.processed.is_empty() {
            return Err(SyntaxError::at(
                SyntaxErrorKind::EmptyContext,
                self.line,
                self.span,
                format!("{} has no keywords attached to it.", self.keyword),
            ));
        }
        Ok(())
    }

    /// Pull tokens until a name at or above this block's depth starts a new
    /// logical line, or the input ends.
    pub fn next_queriable<I>(&mut self, tokens: &mut I) -> Result<Status<'src>>
    where
        I: Iterator<Item = Token<'src>>,
    {
        let mut buffer = String::new();
        if let Some(token) = self.end {
            return Ok(self.status(token, buffer, true));
        }

        loop {
            let Some(token) = tokens.next() else {
                let token = end_marker(self.line, self.span.end);
                self.end = Some(token);
                return Ok(self.status(token, buffer, true));
            };
            match token.kind {
                TokenKind::Name => {
                    if self.depth <= self.target && self.queriable {
                        self.queriable = false;
                        self.line_start = false;
                        return Ok(self.status(token, buffer, false));
                    }
                    if self.line_start {
                        buffer.push_str(&"\t".repeat(self.depth));
                        self.line_start = false;
                    }
                    buffer.push(' ');
                }
                TokenKind::Indent => {
                    self.depth += 1;
                    continue;
                }
                TokenKind::Dedent => {
                    self.depth = self.depth.saturating_sub(1);
                }
                TokenKind::EndMarker => {
                    self.end = Some(token);
                    return Ok(self.status(token, buffer, true));
                }
                TokenKind::Newline => {
                    self.queriable = true;
                    self.line_start = true;
                }
                TokenKind::Nl => {
                    self.line_start = true;
                }
                TokenKind::Error => return Err(SyntaxError::invalid_token(&token)),
                TokenKind::Op | TokenKind::Number | TokenKind::String | TokenKind::Comment => {}
            }
            buffer.push_str(token.text);
        }
    }

    /// Read the rest of the current logical line as raw text.
    ///
    /// Used after a yielded name that turned out to start a line of code;
    /// re-arms the block so the next line can yield again.
    pub fn consume_line<I>(&mut self, tokens: &mut I) -> Result<String>
    where
        I: Iterator<Item = Token<'src>>,
    {
        let mut line = String::new();
        loop {
            let Some(token) = tokens.next() else {
                self.end = Some(end_marker(self.line, self.span.end));
                return Ok(line);
            };
            match token.kind {
                TokenKind::Name => line.push(' '),
                TokenKind::EndMarker => {
                    self.end = Some(token);
                    return Ok(line);
                }
                TokenKind::Error => return Err(SyntaxError::invalid_token(&token)),
                _ => {}
            }
            line.push_str(token.text);
            if token.kind == TokenKind::Newline {
                self.queriable = true;
                self.line_start = true;
                return Ok(line);
            }
        }
    }

    /// Take over a status produced elsewhere (a parameter list or a closed
    /// child block) that consumed tokens on this block's behalf.
    pub fn resume(&mut self, status: &Status<'src>) {
        self.depth = status.depth;
        self.queriable = false;
        self.line_start = false;
        if status.eof {
            self.end = Some(status.token);
        }
    }

    fn status(&self, token: Token<'src>, buffer: String, eof: bool) -> Status<'src> {
        trace!(
            "{:?} yields {:?} at depth {} (eof: {})",
            self.keyword, token.text, self.depth, eof
        );
        Status {
            token,
            depth: self.depth,
            buffer,
            eof,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use snakefmt_tokenizer::Tokenizer;

    fn open<'src>(
        tokens: &mut Tokenizer<'src>,
        parent: &mut KeywordBlock<'src>,
        target: usize,
    ) -> Result<KeywordBlock<'src>> {
        let keyword = tokens.next().unwrap();
        KeywordBlock::parse(&keyword, target, Some(parent), &Dialect::default(), tokens)
    }

    #[test]
    fn test_header_and_children() {
        let mut tokens = Tokenizer::new("rule foo: # main\n\tinput: 'a'\n");
        let mut root = KeywordBlock::root("Global", true);
        let mut rule = open(&mut tokens, &mut root, 1).unwrap();
        assert_eq!(rule.keyword(), "rule foo");
        assert_eq!(rule.comment(), " # main");
        assert!(root.processed_keywords().contains("rule foo"));

        let status = rule.next_queriable(&mut tokens).unwrap();
        assert_eq!(status.token.text, "input");
        assert_eq!(status.depth, 1);
        assert!(!status.eof);
    }

    #[test]
    fn test_newline_required_after_header() {
        let mut tokens = Tokenizer::new("rule a: input: 'x'\n");
        let mut root = KeywordBlock::root("Global", true);
        let error = open(&mut tokens, &mut root, 1).unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::Syntax);
        assert_eq!(error.to_string(), "L1: Newline expected after keyword 'rule a'");
    }

    #[test]
    fn test_duplicate_child() {
        let mut tokens = Tokenizer::new("rule a:\n");
        let keyword = tokens.next().unwrap();
        let mut root = KeywordBlock::root("Global", true);
        root.register_child_keyword(&keyword, "rule a").unwrap();
        root.register_child_keyword(&keyword, "rule b").unwrap();
        let error = KeywordBlock::parse(
            &keyword,
            1,
            Some(&mut root),
            &Dialect::default(),
            &mut tokens,
        )
        .unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::DuplicateKeyword);
        assert_eq!(error.message, "'rule a' specified twice.");
    }

    #[test]
    fn test_check_empty() {
        let mut tokens = Tokenizer::new("rule a:\n");
        let mut root = KeywordBlock::root("Global", true);
        let mut rule = open(&mut tokens, &mut root, 1).unwrap();
        let error = rule.check_empty().unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::EmptyContext);
        assert_eq!(error.to_string(), "L1: rule a has no keywords attached to it.");

        let keyword = Tokenizer::new("input").next().unwrap();
        rule.register_child_keyword(&keyword, "input").unwrap();
        assert!(rule.check_empty().is_ok());
    }

    #[test]
    fn test_one_yield_per_logical_line() {
        let mut tokens = Tokenizer::new("x = y\nz\n");
        let mut root = KeywordBlock::root("Global", true);
        let first = root.next_queriable(&mut tokens).unwrap();
        assert_eq!(first.token.text, "x");
        let second = root.next_queriable(&mut tokens).unwrap();
        assert_eq!(second.token.text, "z");
        assert_eq!(second.buffer, "= y\n");
    }

    #[test]
    fn test_deeper_names_go_to_buffer() {
        let mut tokens = Tokenizer::new("def f():\n    return 1\ng\n");
        let mut root = KeywordBlock::root("Global", true);
        let def = root.next_queriable(&mut tokens).unwrap();
        assert_eq!(def.token.text, "def");
        let line = root.consume_line(&mut tokens).unwrap();
        assert_eq!(line, " f():\n");

        let g = root.next_queriable(&mut tokens).unwrap();
        assert_eq!(g.token.text, "g");
        assert_eq!(g.depth, 0);
        assert_eq!(g.buffer, "\t return1\n");
    }

    #[test]
    fn test_depth_returns_after_indent_dedent() {
        let mut tokens = Tokenizer::new("a\n  b\nc\n");
        let mut root = KeywordBlock::root("Global", true);
        root.next_queriable(&mut tokens).unwrap();
        let c = root.next_queriable(&mut tokens).unwrap();
        assert_eq!(c.token.text, "c");
        assert_eq!(c.depth, 0);
    }

    #[test]
    fn test_tokenizer_errors_surface() {
        let mut tokens = Tokenizer::new("a\n    b\n  c\n");
        let mut root = KeywordBlock::root("Global", true);
        root.next_queriable(&mut tokens).unwrap();
        let error = root.next_queriable(&mut tokens).unwrap_err();
        assert_eq!(error.kind, SyntaxErrorKind::InvalidToken);
        assert_eq!(error.line, 3);

        let mut tokens = Tokenizer::new("a = \"b\n");
        let mut root = KeywordBlock::root("Global", true);
        root.next_queriable(&mut tokens).unwrap();
        let error = root.consume_line(&mut tokens).unwrap_err();
        assert_eq!(error.message, "Unterminated string literal \"b");
    }

    #[test]
    fn test_end_of_input() {
        let mut tokens = Tokenizer::new("a\n");
        let mut root = KeywordBlock::root("Global", true);
        root.next_queriable(&mut tokens).unwrap();
        let end = root.next_queriable(&mut tokens).unwrap();
        assert!(end.eof);
        assert_eq!(end.token.kind, TokenKind::EndMarker);
        assert_eq!(end.buffer, "\n");
        assert!(root.next_queriable(&mut tokens).unwrap().eof);
    }

    #[test]
    fn test_resume_takes_depth_and_line() {
        let mut tokens = Tokenizer::new("x\n\ty = 1\nz\n");
        let mut root = KeywordBlock::root("Global", true);
        root.next_queriable(&mut tokens).unwrap();
        // Someone else consumes the line break and the indent.
        tokens.next();
        let indent = tokens.next().unwrap();
        root.resume(&Status {
            token: indent,
            depth: 1,
            buffer: String::new(),
            eof: false,
        });
        let status = root.next_queriable(&mut tokens).unwrap();
        assert_eq!(status.token.text, "z");
        assert_eq!(status.depth, 0);
        assert_eq!(status.buffer, " y=1\n");
    }
}
