//! Keyword configuration for the workflow dialect.

use std::collections::BTreeSet;

use crate::grammar::Language;

/// Which keywords exist and how they behave.
///
/// Every parser receives the dialect by reference; nothing is global, so
/// tests and alternative dialects can swap any table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    /// Keywords that may be followed by a user-supplied name
    /// (default: `rule`, `checkpoint`)
    pub nameable: BTreeSet<String>,

    /// Keywords whose body is raw host-language code
    /// (default: `run`, `onstart`, `onsuccess`, `onerror`)
    pub accepts_code: BTreeSet<String>,

    /// Top-level vocabulary (default: [`Language::snakemake`])
    pub language: Language,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            nameable: ["rule", "checkpoint"].map(String::from).into(),
            accepts_code: ["run", "onstart", "onsuccess", "onerror"]
                .map(String::from)
                .into(),
            language: Language::snakemake(),
        }
    }
}

impl Dialect {
    /// Create the default (Snakemake) dialect.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dialect with no keywords at all.
    pub fn empty() -> Self {
        Self {
            nameable: BTreeSet::new(),
            accepts_code: BTreeSet::new(),
            language: Language::new(),
        }
    }

    /// Allow `keyword` to take a user-supplied name.
    pub fn with_nameable(mut self, keyword: impl Into<String>) -> Self {
        self.nameable.insert(keyword.into());
        self
    }

    /// Treat the body of `keyword` as raw code.
    pub fn with_code_block(mut self, keyword: impl Into<String>) -> Self {
        self.accepts_code.insert(keyword.into());
        self
    }

    /// Replace the top-level vocabulary.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn is_nameable(&self, keyword: &str) -> bool {
        self.nameable.contains(keyword)
    }

    pub fn accepts_code(&self, keyword: &str) -> bool {
        self.accepts_code.contains(keyword)
    }
}
