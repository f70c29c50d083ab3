//! Predicates over single tokens.

use snakefmt_tokenizer::{Span, Token, TokenKind};

fn is_op(token: &Token<'_>, text: &str) -> bool {
    token.kind == TokenKind::Op && token.text == text
}

pub fn is_colon(token: &Token<'_>) -> bool {
    is_op(token, ":")
}

/// `(`, `[` or `{`.
pub fn is_open_bracket(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Op && matches!(token.text, "(" | "[" | "{")
}

/// `)`, `]` or `}`.
pub fn is_close_bracket(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Op && matches!(token.text, ")" | "]" | "}")
}

pub fn is_equals(token: &Token<'_>) -> bool {
    is_op(token, "=")
}

pub fn is_comma(token: &Token<'_>) -> bool {
    is_op(token, ",")
}

/// Anything but comments and tokens made only of whitespace (line breaks,
/// indentation, dedents, the end marker).
pub fn is_significant(token: &Token<'_>) -> bool {
    token.kind != TokenKind::Comment && !token.text.trim().is_empty()
}

/// Stand-in end marker for token sources that stop without producing one.
pub(crate) fn end_marker<'src>(line: u32, offset: u32) -> Token<'src> {
    Token::new(TokenKind::EndMarker, Span::new(offset, offset), "", line, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use snakefmt_tokenizer::Tokenizer;

    fn first(source: &str) -> Token<'_> {
        Tokenizer::new(source).next().unwrap()
    }

    #[test]
    fn test_operators() {
        assert!(is_colon(&first(":")));
        assert!(!is_colon(&first(":=")));
        assert!(is_equals(&first("=")));
        assert!(!is_equals(&first("==")));
        assert!(is_comma(&first(",")));
        for open in ["(", "[", "{"] {
            assert!(is_open_bracket(&first(open)));
            assert!(!is_close_bracket(&first(open)));
        }
        for close in [")", "]", "}"] {
            assert!(is_close_bracket(&first(close)));
        }
    }

    #[test]
    fn test_string_is_not_an_operator() {
        assert!(!is_colon(&first("':'")));
        assert!(!is_comma(&first("','")));
    }

    #[test]
    fn test_significance() {
        let tokens: Vec<_> = Tokenizer::new("a: # c\n\tb\n").collect();
        let significant: Vec<_> = tokens
            .iter()
            .filter(|t| is_significant(t))
            .map(|t| t.text)
            .collect();
        assert_eq!(significant, vec!["a", ":", "b"]);
    }
}
