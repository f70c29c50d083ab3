//! Document tree produced by [`Parser`](crate::Parser).

use std::fmt;

use crate::{ParamShape, Parameter, ParameterList};

/// A parsed workflow file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snakefile {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
}

/// One element of a block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Lines of host-language code.
    Code(Code),
    /// A keyword block, e.g. `rule foo:`.
    Block(Block),
    /// A keyword followed by parameters, e.g. `input: "a"`.
    Params(ParamBlock),
}

/// Raw code between keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub text: String,
    /// Indentation level of the code lines, one below the owning keyword.
    pub depth: usize,
}

/// A keyword block and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Keyword identity, e.g. `rule foo`.
    pub keyword: String,
    /// Trailing comment of the header line, with a leading space.
    pub comment: String,
    /// Indentation level of the keyword line; 0 at the top level.
    pub depth: usize,
    pub line: u32,
    /// Whether the body is code (`run:`, `onstart:`).
    pub accepts_code: bool,
    pub children: Vec<Node>,
}

/// A keyword with its parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBlock {
    pub keyword: String,
    /// Indentation level of the keyword line, as for [`Block`].
    pub depth: usize,
    pub line: u32,
    pub shape: ParamShape,
    pub positional: Vec<Parameter>,
    pub keyed: Vec<Parameter>,
}

impl Snakefile {
    /// First top-level node with the given keyword identity.
    pub fn get(&self, keyword: &str) -> Option<&Node> {
        find(&self.nodes, keyword)
    }

    /// Top-level blocks (rules, checkpoints, handlers...).
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.nodes.iter().filter_map(Node::as_block)
    }

    pub fn block(&self, keyword: &str) -> Option<&Block> {
        self.get(keyword).and_then(Node::as_block)
    }

    pub fn params(&self, keyword: &str) -> Option<&ParamBlock> {
        self.get(keyword).and_then(Node::as_params)
    }
}

impl Node {
    /// Keyword identity, `None` for code.
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Node::Code(_) => None,
            Node::Block(block) => Some(&block.keyword),
            Node::Params(params) => Some(&params.keyword),
        }
    }

    pub fn as_code(&self) -> Option<&Code> {
        match self {
            Node::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_params(&self) -> Option<&ParamBlock> {
        match self {
            Node::Params(params) => Some(params),
            _ => None,
        }
    }
}

impl Block {
    pub fn get(&self, keyword: &str) -> Option<&Node> {
        find(&self.children, keyword)
    }

    pub fn block(&self, keyword: &str) -> Option<&Block> {
        self.get(keyword).and_then(Node::as_block)
    }

    pub fn params(&self, keyword: &str) -> Option<&ParamBlock> {
        self.get(keyword).and_then(Node::as_params)
    }

    /// Code chunks of the body, in order.
    pub fn code(&self) -> impl Iterator<Item = &Code> {
        self.children.iter().filter_map(Node::as_code)
    }
}

impl ParamBlock {
    pub(crate) fn new(line: u32, depth: usize, shape: ParamShape, list: ParameterList<'_>) -> Self {
        let keyword = list.keyword().to_string();
        let (positional, keyed) = list.into_parts();
        Self {
            keyword,
            depth,
            line,
            shape,
            positional,
            keyed,
        }
    }

    /// Positional parameters first, then keyed ones.
    pub fn all(&self) -> impl Iterator<Item = &Parameter> {
        self.positional.iter().chain(&self.keyed)
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find<'a>(nodes: &'a [Node], keyword: &str) -> Option<&'a Node> {
    nodes.iter().find(|node| node.keyword() == Some(keyword))
}

// Outline rendering, one line per keyword and per code line.

impl fmt::Display for Snakefile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.nodes, 0)
    }
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node], indent: usize) -> fmt::Result {
    for node in nodes {
        let pad = "  ".repeat(indent);
        match node {
            Node::Code(code) => {
                for line in code.text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                    writeln!(f, "{pad}| {line}")?;
                }
            }
            Node::Block(block) => {
                writeln!(f, "{pad}{}:{}", block.keyword, block.comment)?;
                write_nodes(f, &block.children, indent + 1)?;
            }
            Node::Params(params) => {
                write!(f, "{pad}{}:", params.keyword)?;
                for (i, param) in params.all().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    if param.has_key() {
                        write!(f, "{sep}{}={}", param.key, param.value)?;
                    } else {
                        write!(f, "{sep}{}", param.value)?;
                    }
                }
                writeln!(f)?;
            }
        }
    }
    Ok(())
}
