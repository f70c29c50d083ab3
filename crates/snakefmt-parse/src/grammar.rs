//! Keyword vocabularies: which words are keywords in which block, and what
//! follows each of them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Answers whether a word is a reserved keyword in some context.
pub trait Vocabulary {
    fn recognises(&self, word: &str) -> bool;
}

impl Vocabulary for BTreeSet<String> {
    fn recognises(&self, word: &str) -> bool {
        self.contains(word)
    }
}

impl Vocabulary for HashSet<&str> {
    fn recognises(&self, word: &str) -> bool {
        self.contains(word)
    }
}

impl Vocabulary for [&str] {
    fn recognises(&self, word: &str) -> bool {
        self.iter().any(|known| *known == word)
    }
}

/// The kind of parameter list a keyword takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamShape {
    /// Any mix of positional and `key = value` parameters.
    List,
    /// Exactly one positional parameter.
    Single,
    /// Positional parameters only.
    NoKeyword,
}

/// What a keyword introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grammar {
    /// A nested keyword block with its own vocabulary.
    Context(Language),
    /// A parameter list.
    Params(ParamShape),
}

/// The keywords valid inside one kind of block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Language {
    entries: BTreeMap<String, Grammar>,
}

impl Language {
    /// A vocabulary without keywords (raw code blocks).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a keyword.
    pub fn with(mut self, keyword: impl Into<String>, grammar: Grammar) -> Self {
        self.entries.insert(keyword.into(), grammar);
        self
    }

    /// Add a parameter keyword of the given shape.
    pub fn params(self, keyword: impl Into<String>, shape: ParamShape) -> Self {
        self.with(keyword, Grammar::Params(shape))
    }

    /// Add a keyword opening a nested block.
    pub fn context(self, keyword: impl Into<String>, language: Language) -> Self {
        self.with(keyword, Grammar::Context(language))
    }

    pub fn get(&self, keyword: &str) -> Option<&Grammar> {
        self.entries.get(keyword)
    }

    /// Keywords in alphabetical order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Top level of a Snakefile.
    pub fn snakemake() -> Self {
        use ParamShape::*;
        let mut language = Self::new();
        for keyword in [
            "include",
            "workdir",
            "configfile",
            "pepfile",
            "pepschema",
            "report",
            "singularity",
            "container",
        ] {
            language = language.params(keyword, Single);
        }
        for keyword in ["onstart", "onsuccess", "onerror"] {
            language = language.context(keyword, Self::new());
        }
        language
            .params("ruleorder", List)
            .params("wildcard_constraints", List)
            .params("localrules", NoKeyword)
            .params("envvars", NoKeyword)
            .context("rule", Self::snakemake_rule())
            .context("checkpoint", Self::snakemake_rule())
            .context("subworkflow", Self::snakemake_subworkflow())
    }

    /// Body of a `rule` or `checkpoint`.
    pub fn snakemake_rule() -> Self {
        use ParamShape::*;
        let mut language = Self::new();
        for keyword in [
            "name",
            "threads",
            "priority",
            "version",
            "message",
            "benchmark",
            "conda",
            "singularity",
            "container",
            "shadow",
            "group",
            "cache",
            "shell",
            "script",
            "notebook",
            "wrapper",
            "cwl",
        ] {
            language = language.params(keyword, Single);
        }
        for keyword in [
            "input",
            "output",
            "params",
            "resources",
            "log",
            "wildcard_constraints",
        ] {
            language = language.params(keyword, List);
        }
        language
            .params("envmodules", NoKeyword)
            .context("run", Self::new())
    }

    /// Body of a `subworkflow`.
    pub fn snakemake_subworkflow() -> Self {
        ["snakefile", "workdir", "configfile"]
            .into_iter()
            .fold(Self::new(), |language, keyword| {
                language.params(keyword, ParamShape::Single)
            })
    }
}

impl Vocabulary for Language {
    fn recognises(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }
}
