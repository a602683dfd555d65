//! Types of the formula language and the name→type environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ParseError;
use crate::factory::{FormulaFactory, Keyword};
use crate::lexer::{self, Spanned, Token};
use crate::normalize::normalize;

/// A fully determined type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    /// ℤ
    Integer,
    /// BOOL
    Boolean,
    /// A carrier set declared in a context
    Given(String),
    /// ℙ(T)
    Power(Box<Type>),
    /// T×U
    Product(Box<Type>, Box<Type>),
}

impl Type {
    pub fn power(inner: Type) -> Type {
        Type::Power(Box::new(inner))
    }

    pub fn product(left: Type, right: Type) -> Type {
        Type::Product(Box::new(left), Box::new(right))
    }

    /// ℙ(l×r), the type of a relation.
    pub fn relation(left: Type, right: Type) -> Type {
        Type::power(Type::product(left, right))
    }

    /// Parse a type written in either notation: `ℙ(S×ℤ)` or `POW(S**INT)`.
    pub fn parse(text: &str) -> Result<Type, ParseError> {
        let tokens = lexer::lex(&FormulaFactory::default(), &normalize(text))?;
        let mut p = TypeParser {
            tokens: &tokens,
            pos: 0,
        };
        let t = p.product()?;
        if p.peek() != &Token::Eof {
            return Err(p.err("unexpected input after type"));
        }
        Ok(t)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "\u{2124}"),
            Type::Boolean => write!(f, "BOOL"),
            Type::Given(name) => write!(f, "{}", name),
            Type::Power(inner) => write!(f, "\u{2119}({})", inner),
            Type::Product(l, r) => match r.as_ref() {
                Type::Product(..) => write!(f, "{}\u{00d7}({})", l, r),
                _ => write!(f, "{}\u{00d7}{}", l, r),
            },
        }
    }
}

impl From<Type> for String {
    fn from(t: Type) -> String {
        t.to_string()
    }
}

impl TryFrom<String> for Type {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Type, ParseError> {
        Type::parse(&s)
    }
}

struct TypeParser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].token
    }

    fn err(&self, msg: &str) -> ParseError {
        let at = self.tokens[self.pos.min(self.tokens.len() - 1)].start;
        ParseError::single(at, msg)
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn expect(&mut self, t: Token, msg: &str) -> Result<(), ParseError> {
        if self.peek() == &t {
            self.bump();
            Ok(())
        } else {
            Err(self.err(msg))
        }
    }

    fn product(&mut self) -> Result<Type, ParseError> {
        let mut left = self.atom()?;
        while self.peek() == &Token::Times {
            self.bump();
            let right = self.atom()?;
            left = Type::product(left, right);
        }
        Ok(left)
    }

    fn atom(&mut self) -> Result<Type, ParseError> {
        match self.peek().clone() {
            Token::Integers => {
                self.bump();
                Ok(Type::Integer)
            }
            Token::Keyword(Keyword::BoolSet) => {
                self.bump();
                Ok(Type::Boolean)
            }
            Token::Pow => {
                self.bump();
                self.expect(Token::LParen, "expected '(' after \u{2119}")?;
                let inner = self.product()?;
                self.expect(Token::RParen, "expected ')'")?;
                Ok(Type::power(inner))
            }
            Token::LParen => {
                self.bump();
                let inner = self.product()?;
                self.expect(Token::RParen, "expected ')'")?;
                Ok(inner)
            }
            Token::Word(name) if !name.ends_with('\'') => {
                self.bump();
                Ok(Type::Given(name))
            }
            _ => Err(self.err("expected a type")),
        }
    }
}

/// Name→type mapping used to seed the type checker.
///
/// Insertion is first-come: re-adding a name that is already present is a
/// no-op. Iteration order is by name, so two environments built from the
/// same declarations compare equal and print identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeEnvironment {
    names: BTreeMap<String, Type>,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` unless it is already bound. Returns whether the name
    /// was inserted.
    pub fn add_if_absent(&mut self, name: impl Into<String>, ty: Type) -> bool {
        let name = name.into();
        if self.names.contains_key(&name) {
            return false;
        }
        self.names.insert(name, ty);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.names.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
