//! Parser core for Snakemake workflow files: keyword blocks, parameter lists
//! and the raw code around them.

mod tracing_macros;

pub use snakefmt_tokenizer::{Span, Token, TokenKind, Tokenizer};

pub mod classify;

mod error;
pub use error::{Result, SyntaxError, SyntaxErrorKind};

mod diagnostic;

mod dialect;
pub use dialect::Dialect;

mod grammar;
pub use grammar::{Grammar, Language, ParamShape, Vocabulary};

mod header;
pub use header::Header;

mod keyword;
pub use keyword::{KeywordBlock, Status};

mod param;
pub use param::{Parameter, is_assignment_target};

mod params;
pub use params::{NoKeywordParamList, ParameterList, SingleParam};

mod tree;
pub use tree::{Block, Code, Node, ParamBlock, Snakefile};

mod parser;
pub use parser::{Parser, ROOT_KEYWORD};

/// Parse `source` with the default Snakemake dialect.
pub fn parse(source: &str) -> Result<Snakefile> {
    Parser::new(source, &Dialect::default()).parse()
}
