//! A single parameter being accumulated from tokens.

use std::iter::Peekable;
use std::str::Chars;

use snakefmt_tokenizer::{Token, TokenKind};

use crate::{Result, SyntaxError, SyntaxErrorKind};

/// Words of the host language that can never be assigned to.
const RESERVED_WORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// One positional (`value`) or keyed (`key = value`) parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Empty for positional parameters.
    pub key: String,
    pub value: String,
    /// Comments met while reading the parameter, in order.
    pub comments: Vec<String>,
    /// Whether the value is made only of string literals.
    pub is_string: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            comments: Vec::new(),
            is_string: true,
        }
    }
}

impl Parameter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Append a token to the value.
    pub fn add_elem(&mut self, token: &Token<'_>) {
        if token.kind != TokenKind::String {
            self.is_string = false;
        }
        if !self.value.is_empty() && token.kind == TokenKind::Name {
            self.value.push(' ');
        }
        self.value.push_str(token.text);
    }

    /// Turn the accumulated value into the key on `=`.
    pub fn promote_to_keyed(&mut self, token: &Token<'_>) -> Result<()> {
        if !self.has_value() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::InvalidParameterSyntax,
                token,
                "Operator = used with no preceding key",
            ));
        }
        if !is_assignment_target(&self.value) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::InvalidParameterSyntax,
                token,
                format!("Invalid key {}", self.value),
            ));
        }
        self.key = std::mem::take(&mut self.value);
        self.is_string = true;
        Ok(())
    }
}

/// Whether `text` is a name, optionally followed by `.attr` and `[...]`
/// trailers. Whitespace is allowed around trailers, not inside names.
pub fn is_assignment_target(text: &str) -> bool {
    let mut chars = text.trim().chars().peekable();
    if !take_identifier(&mut chars) {
        return false;
    }
    loop {
        skip_whitespace(&mut chars);
        match chars.next() {
            None => return true,
            Some('.') => {
                skip_whitespace(&mut chars);
                if !take_identifier(&mut chars) {
                    return false;
                }
            }
            Some('[') => {
                let mut depth = 1;
                while depth > 0 {
                    match chars.next() {
                        Some('[') => depth += 1,
                        Some(']') => depth -= 1,
                        Some(_) => {}
                        None => return false,
                    }
                }
            }
            Some(_) => return false,
        }
    }
}

/// Consume an identifier that is not a reserved word.
fn take_identifier(chars: &mut Peekable<Chars<'_>>) -> bool {
    let mut identifier = String::new();
    while let Some(&c) = chars.peek() {
        let valid = if identifier.is_empty() {
            c == '_' || c.is_alphabetic()
        } else {
            c == '_' || c.is_alphanumeric()
        };
        if !valid {
            break;
        }
        identifier.push(c);
        chars.next();
    }
    !identifier.is_empty() && !RESERVED_WORDS.contains(&identifier.as_str())
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}
