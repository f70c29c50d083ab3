//! Document driver: turns a token stream into a [`Snakefile`].

use snakefmt_tokenizer::{Token, Tokenizer};

use crate::grammar::{Grammar, Language};
#[allow(unused_imports)]
use crate::debug;
use crate::tree::{Block, Code, Node, ParamBlock, Snakefile};
use crate::{Dialect, KeywordBlock, Result, Status, SyntaxError, SyntaxErrorKind};

/// Keyword identity of the implicit block around a whole file.
pub const ROOT_KEYWORD: &str = "Global";

/// Parser for a whole workflow file.
pub struct Parser<'d, I> {
    dialect: &'d Dialect,
    tokens: I,
}

/// A block whose body is being read.
struct Frame<'d, 'src> {
    block: KeywordBlock<'src>,
    language: &'d Language,
    children: Vec<Node>,
    /// Code read since the last keyword.
    code: String,
}

impl<'d, 'src> Frame<'d, 'src> {
    fn new(block: KeywordBlock<'src>, language: &'d Language) -> Self {
        Self {
            block,
            language,
            children: Vec::new(),
            code: String::new(),
        }
    }

    fn flush_code(&mut self) {
        let text = std::mem::take(&mut self.code);
        if text.trim().is_empty() {
            return;
        }
        self.children.push(Node::Code(Code {
            text,
            depth: self.block.target(),
        }));
    }

    fn into_block(self) -> Block {
        Block {
            keyword: self.block.keyword().to_string(),
            comment: self.block.comment().to_string(),
            depth: self.block.target().saturating_sub(1),
            line: self.block.line(),
            accepts_code: self.block.accepts_code(),
            children: self.children,
        }
    }
}

impl<'d, 'src> Parser<'d, Tokenizer<'src>> {
    /// Create a parser over `source` using the bundled tokenizer.
    pub fn new(source: &'src str, dialect: &'d Dialect) -> Self {
        Self::from_tokens(Tokenizer::new(source), dialect)
    }
}

impl<'d, 'src, I> Parser<'d, I>
where
    I: Iterator<Item = Token<'src>>,
{
    /// Create a parser over any token source.
    pub fn from_tokens(tokens: I, dialect: &'d Dialect) -> Self {
        Self { dialect, tokens }
    }

    /// Parse the whole input.
    pub fn parse(mut self) -> Result<Snakefile> {
        let dialect = self.dialect;
        let mut root = Frame::new(
            KeywordBlock::root(ROOT_KEYWORD, true),
            &dialect.language,
        );
        let mut stack: Vec<Frame<'d, 'src>> = Vec::new();
        let mut carried: Option<Status<'src>> = None;

        loop {
            let status = match carried.take() {
                Some(status) => status,
                None => current(&mut root, &mut stack)
                    .block
                    .next_queriable(&mut self.tokens)?,
            };
            current(&mut root, &mut stack)
                .code
                .push_str(&status.buffer);

            while status.depth < stack.len() {
                close(&mut root, &mut stack)?;
            }
            let level = stack.len();
            let frame = current(&mut root, &mut stack);
            frame.block.resume(&status);
            if status.eof {
                break;
            }

            let token = status.token;
            let language: &'d Language = frame.language;
            match language.get(token.text) {
                Some(Grammar::Context(inner)) => {
                    frame.flush_code();
                    let block = KeywordBlock::parse(
                        &token,
                        level + 1,
                        Some(&mut frame.block),
                        dialect,
                        &mut self.tokens,
                    )?;
                    stack.push(Frame::new(block, inner));
                }
                Some(Grammar::Params(shape)) => {
                    frame.flush_code();
                    let list = shape.parse(&token, level + 1, language, dialect, &mut self.tokens)?;
                    frame.block.register_child_keyword(&token, token.text)?;
                    carried = Some(Status {
                        token: list.token(),
                        depth: list.depth(),
                        buffer: String::new(),
                        eof: list.eof(),
                    });
                    frame
                        .children
                        .push(Node::Params(ParamBlock::new(token.line, level, *shape, list)));
                }
                None if frame.block.accepts_code() => {
                    frame.code.push_str(token.text);
                    let rest = frame.block.consume_line(&mut self.tokens)?;
                    frame.code.push_str(&rest);
                }
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnrecognisedKeyword,
                        &token,
                        format!(
                            "Unrecognised keyword '{}' in {} definition",
                            token.text,
                            frame.block.keyword()
                        ),
                    ));
                }
            }
        }

        while !stack.is_empty() {
            close(&mut root, &mut stack)?;
        }
        root.flush_code();
        Ok(Snakefile {
            nodes: root.children,
        })
    }
}

/// The innermost open block.
fn current<'a, 'd, 'src>(
    root: &'a mut Frame<'d, 'src>,
    stack: &'a mut [Frame<'d, 'src>],
) -> &'a mut Frame<'d, 'src> {
    match stack.last_mut() {
        Some(frame) => frame,
        None => root,
    }
}

/// Close the innermost block and attach it to its parent.
fn close<'d, 'src>(root: &mut Frame<'d, 'src>, stack: &mut Vec<Frame<'d, 'src>>) -> Result<()> {
    let Some(mut frame) = stack.pop() else {
        return Ok(());
    };
    frame.flush_code();
    if !frame.block.accepts_code() {
        frame.block.check_empty()?;
    }
    debug!("close block {:?}", frame.block.keyword());
    let block = frame.into_block();
    current(root, stack).children.push(Node::Block(block));
    Ok(())
}
