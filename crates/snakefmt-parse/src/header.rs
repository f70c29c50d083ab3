//! `keyword [name]:` headers.

use snakefmt_tokenizer::{Token, TokenKind};

#[allow(unused_imports)]
use crate::trace;
use crate::classify::is_colon;
use crate::{Dialect, Result, SyntaxError, SyntaxErrorKind};

/// A resolved block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'src> {
    /// Keyword identity: the keyword, plus `" name"` for named blocks.
    pub keyword: String,
    /// Depth at which the header appears.
    pub target: usize,
    /// Depth before the body begins: `max(target - 1, 0)`.
    pub depth: usize,
    /// The colon closing the header.
    pub token: Token<'src>,
}

impl<'src> Header<'src> {
    /// Parse the rest of a header whose keyword is `keyword`.
    ///
    /// The cursor must sit right after the keyword token; on success it sits
    /// right after the colon.
    pub fn parse<I>(
        keyword: &Token<'src>,
        target: usize,
        dialect: &Dialect,
        tokens: &mut I,
    ) -> Result<Self>
    where
        I: Iterator<Item = Token<'src>>,
    {
        let mut identity = keyword.text.to_string();
        let mut token = pull(tokens, keyword)?;

        if !is_colon(&token) && dialect.is_nameable(&identity) {
            if token.kind != TokenKind::Name {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::NamedKeyword,
                    &token,
                    format!("Invalid name {} for '{}'", token.text, identity),
                ));
            }
            identity.push(' ');
            identity.push_str(token.text);
            token = pull(tokens, &token)?;
        }

        if !is_colon(&token) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::Syntax,
                &token,
                format!("Colon (not '{}') expected after '{}'", token.text, identity),
            ));
        }

        trace!("header {:?} at depth {}", identity, target);
        Ok(Self {
            keyword: identity,
            target,
            depth: target.saturating_sub(1),
            token,
        })
    }
}

/// Next token from a source that must not be exhausted yet.
pub(crate) fn pull<'src, I>(tokens: &mut I, after: &Token<'src>) -> Result<Token<'src>>
where
    I: Iterator<Item = Token<'src>>,
{
    let token = tokens.next().ok_or_else(|| {
        SyntaxError::new(
            SyntaxErrorKind::UnexpectedEof,
            after,
            format!("Unexpected end of input after '{}'", after.text),
        )
    })?;
    if token.kind == TokenKind::Error {
        return Err(SyntaxError::invalid_token(&token));
    }
    Ok(token)
}
