//! Parameter lists following a keyword: `input: "a", b = "c"`.

use std::ops::Deref;

use snakefmt_tokenizer::{Token, TokenKind};

#[allow(unused_imports)]
use crate::trace;
use crate::classify::{is_close_bracket, is_comma, is_equals, is_open_bracket, is_significant};
use crate::grammar::{ParamShape, Vocabulary};
use crate::header::Header;
use crate::{Dialect, Parameter, Result, SyntaxError, SyntaxErrorKind};

/// The parameters of one keyword, split into positional and keyed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList<'src> {
    keyword: String,
    target: usize,
    depth: usize,
    positional: Vec<Parameter>,
    keyed: Vec<Parameter>,
    eof: bool,
    /// Last token pulled: the first token after the list, or the end marker.
    token: Token<'src>,
}

impl<'src> ParameterList<'src> {
    /// Parse `keyword: params...` up to the first significant token on a new
    /// line that is shallower than `target`.
    ///
    /// The cursor must sit right after `keyword`. `vocabulary` is the one of
    /// the enclosing block, used to catch over-indented keywords.
    pub fn parse<I, V>(
        keyword: &Token<'src>,
        target: usize,
        vocabulary: &V,
        dialect: &Dialect,
        tokens: &mut I,
    ) -> Result<Self>
    where
        I: Iterator<Item = Token<'src>>,
        V: Vocabulary + ?Sized,
    {
        let header = Header::parse(keyword, target, dialect, tokens)?;
        let mut list = Self {
            keyword: header.keyword,
            target,
            depth: header.depth,
            positional: Vec::new(),
            keyed: Vec::new(),
            eof: false,
            token: header.token,
        };
        list.parse_params(vocabulary, tokens)?;

        if list.is_empty() {
            return Err(list.error(
                SyntaxErrorKind::NoParameters,
                format!("In {} definition.", list.keyword),
            ));
        }
        Ok(list)
    }

    fn parse_params<I, V>(&mut self, vocabulary: &V, tokens: &mut I) -> Result<()>
    where
        I: Iterator<Item = Token<'src>>,
        V: Vocabulary + ?Sized,
    {
        let mut found_newline = false;
        let mut brackets = 0usize;
        let mut current = Parameter::new();

        loop {
            let Some(token) = tokens.next() else {
                self.flush(current, true);
                self.eof = true;
                return Ok(());
            };
            self.token = token;
            if token.kind == TokenKind::Error {
                return Err(SyntaxError::invalid_token(&token));
            }

            if found_newline && is_significant(&token) && self.depth < self.target {
                self.flush(current, true);
                return Ok(());
            }

            match token.kind {
                TokenKind::Indent => self.depth += 1,
                TokenKind::Dedent => self.depth = self.depth.saturating_sub(1),
                TokenKind::Newline => found_newline = true,
                TokenKind::Nl => found_newline |= brackets == 0,
                TokenKind::Comment => current.comments.push(token.text.to_string()),
                TokenKind::EndMarker | TokenKind::Error => {}
                _ if brackets == 0 && is_equals(&token) => current.promote_to_keyed(&token)?,
                _ if brackets == 0 && is_comma(&token) => {
                    self.flush(std::mem::take(&mut current), false);
                }
                TokenKind::Name | TokenKind::Op | TokenKind::Number | TokenKind::String => {
                    if is_open_bracket(&token) {
                        brackets += 1;
                    } else if is_close_bracket(&token) {
                        brackets = brackets.saturating_sub(1);
                    }
                    let value = current.value.trim();
                    if value.split_whitespace().count() == 1 && vocabulary.recognises(value) {
                        return Err(self.error(
                            SyntaxErrorKind::InvalidParameterSyntax,
                            format!("Over-indented recognised keyword found: '{}'", value),
                        ));
                    }
                    current.add_elem(&token);
                }
            }
        }
    }

    /// Store a finished parameter. Empty ones are kept unless `skip_empty`.
    fn flush(&mut self, param: Parameter, skip_empty: bool) {
        if skip_empty && !param.has_value() {
            return;
        }
        trace!("{:?} parameter {:?} = {:?}", self.keyword, param.key, param.value);
        if param.has_key() {
            self.keyed.push(param);
        } else {
            self.positional.push(param);
        }
    }

    fn error(&self, kind: SyntaxErrorKind, message: String) -> SyntaxError {
        SyntaxError::new(kind, &self.token, message)
    }

    /// Keyword identity.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Depth of the keyword itself plus one.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Depth at which the list ended.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn positional(&self) -> &[Parameter] {
        &self.positional
    }

    pub fn keyed(&self) -> &[Parameter] {
        &self.keyed
    }

    /// Positional parameters first, then keyed ones.
    pub fn all(&self) -> impl Iterator<Item = &Parameter> {
        self.positional.iter().chain(&self.keyed)
    }

    /// Total number of parameters.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the list was ended by the end of input.
    pub fn eof(&self) -> bool {
        self.eof
    }

    /// The token that ended the list; parsing resumes from it.
    pub fn token(&self) -> Token<'src> {
        self.token
    }

    pub fn into_parts(self) -> (Vec<Parameter>, Vec<Parameter>) {
        (self.positional, self.keyed)
    }
}

impl ParamShape {
    /// Parse a parameter list and validate it against this shape.
    pub fn parse<'src, I, V>(
        self,
        keyword: &Token<'src>,
        target: usize,
        vocabulary: &V,
        dialect: &Dialect,
        tokens: &mut I,
    ) -> Result<ParameterList<'src>>
    where
        I: Iterator<Item = Token<'src>>,
        V: Vocabulary + ?Sized,
    {
        let list = ParameterList::parse(keyword, target, vocabulary, dialect, tokens)?;
        self.check(&list)?;
        Ok(list)
    }

    /// Validate an already parsed list.
    pub fn check(self, list: &ParameterList<'_>) -> Result<()> {
        match self {
            ParamShape::List => Ok(()),
            ParamShape::Single if list.len() > 1 => Err(list.error(
                SyntaxErrorKind::TooManyParameters,
                format!("{} definition expects a single parameter", list.keyword),
            )),
            ParamShape::Single if !list.keyed.is_empty() => Err(list.error(
                SyntaxErrorKind::InvalidParameter,
                format!(
                    "{} definition requires a positional (not key/value) parameter",
                    list.keyword
                ),
            )),
            ParamShape::Single => Ok(()),
            ParamShape::NoKeyword if !list.keyed.is_empty() => Err(list.error(
                SyntaxErrorKind::InvalidParameterSyntax,
                format!(
                    "{} definition does not accept key/value parameters",
                    list.keyword
                ),
            )),
            ParamShape::NoKeyword => Ok(()),
        }
    }
}

/// A keyword taking exactly one positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleParam<'src>(ParameterList<'src>);

impl<'src> SingleParam<'src> {
    pub fn parse<I, V>(
        keyword: &Token<'src>,
        target: usize,
        vocabulary: &V,
        dialect: &Dialect,
        tokens: &mut I,
    ) -> Result<Self>
    where
        I: Iterator<Item = Token<'src>>,
        V: Vocabulary + ?Sized,
    {
        ParamShape::Single
            .parse(keyword, target, vocabulary, dialect, tokens)
            .map(Self)
    }

    /// The one parameter.
    pub fn param(&self) -> &Parameter {
        &self.0.positional[0]
    }

    pub fn into_inner(self) -> ParameterList<'src> {
        self.0
    }
}

impl<'src> Deref for SingleParam<'src> {
    type Target = ParameterList<'src>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A keyword taking positional parameters only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoKeywordParamList<'src>(ParameterList<'src>);

impl<'src> NoKeywordParamList<'src> {
    pub fn parse<I, V>(
        keyword: &Token<'src>,
        target: usize,
        vocabulary: &V,
        dialect: &Dialect,
        tokens: &mut I,
    ) -> Result<Self>
    where
        I: Iterator<Item = Token<'src>>,
        V: Vocabulary + ?Sized,
    {
        ParamShape::NoKeyword
            .parse(keyword, target, vocabulary, dialect, tokens)
            .map(Self)
    }

    pub fn into_inner(self) -> ParameterList<'src> {
        self.0
    }
}

impl<'src> Deref for NoKeywordParamList<'src> {
    type Target = ParameterList<'src>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
