//! The formula factory: explicit parsing context.
//!
//! Holds the reserved-word table used by the lexer and exposes the two
//! grammar entry points. A factory is immutable after construction and can
//! be shared freely between threads; callers pass it in rather than
//! reaching for a process-wide default.

use std::collections::HashMap;

use crate::ast::{Expr, Pred};
use crate::error::ParseError;
use crate::{lexer, parser};

/// Reserved words of the formula language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Card,
    Dom,
    Ran,
    Min,
    Max,
    Mod,
    Bool,
    Finite,
    True,
    False,
    BoolSet,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("card", Keyword::Card),
    ("dom", Keyword::Dom),
    ("ran", Keyword::Ran),
    ("min", Keyword::Min),
    ("max", Keyword::Max),
    ("mod", Keyword::Mod),
    ("bool", Keyword::Bool),
    ("finite", Keyword::Finite),
    ("TRUE", Keyword::True),
    ("FALSE", Keyword::False),
    ("BOOL", Keyword::BoolSet),
];

impl Keyword {
    /// The reserved word as written in formulas.
    pub fn word(self) -> &'static str {
        KEYWORDS
            .iter()
            .find(|(_, k)| *k == self)
            .map(|(w, _)| *w)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct FormulaFactory {
    keywords: HashMap<&'static str, Keyword>,
}

impl Default for FormulaFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaFactory {
    pub fn new() -> Self {
        FormulaFactory {
            keywords: KEYWORDS.iter().copied().collect(),
        }
    }

    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        self.keywords.get(word).copied()
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.keywords.contains_key(word)
    }

    /// Parse already-normalized text with the expression grammar.
    pub fn parse_expression(&self, text: &str) -> Result<Expr, ParseError> {
        let tokens = lexer::lex(self, text)?;
        parser::parse_expression(&tokens)
    }

    /// Parse already-normalized text with the predicate grammar.
    pub fn parse_predicate(&self, text: &str) -> Result<Pred, ParseError> {
        let tokens = lexer::lex(self, text)?;
        parser::parse_predicate(&tokens)
    }
}
