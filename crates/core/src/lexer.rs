use std::fmt;

use crate::error::{ParseError, ParseProblem};
use crate::factory::{FormulaFactory, Keyword};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier, possibly primed
    Word(String),
    /// Reserved word (resolved through the formula factory)
    Keyword(Keyword),
    /// Non-negative integer literal
    Int(i64),
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    /// U+00B7 middle dot, separates bound identifiers from the body
    Dot,
    /// U+2223 divides, comprehension bar
    Bar,
    // Logical connectives
    And,     // U+2227
    Or,      // U+2228
    Not,     // U+00AC
    Implies, // U+21D2
    Equiv,   // U+21D4
    Forall,  // U+2200
    Exists,  // U+2203
    Top,     // U+22A4
    Bottom,  // U+22A5
    // Relational operators
    Eq,
    Neq, // U+2260
    Lt,
    Le, // U+2264
    Gt,
    Ge,              // U+2265
    In,              // U+2208
    NotIn,           // U+2209
    Subset,          // U+2286
    NotSubset,       // U+2288
    StrictSubset,    // U+2282
    NotStrictSubset, // U+2284
    // Expression operators
    Maplet,     // U+21A6
    Rel,        // U+2194
    PFun,       // U+21F8
    TFun,       // U+2192
    Union,      // U+222A
    Inter,      // U+2229
    SetMinus,   // U+2216
    Times,      // U+00D7
    UpTo,       // U+2025
    Plus,       // +
    Minus,      // U+2212
    Star,       // U+2217
    Div,        // U+00F7
    Caret,      // ^
    Converse,   // U+223C
    Pow,        // U+2119
    Integers,   // U+2124
    Naturals,   // U+2115
    Naturals1,  // U+2115 followed by 1
    EmptySet,   // U+2205
    // End of input
    Eof,
}

/// Source text of each fixed token, for diagnostics.
fn token_text(t: &Token) -> &'static str {
    match t {
        Token::Word(_) | Token::Keyword(_) | Token::Int(_) => "",
        Token::LParen => "(",
        Token::RParen => ")",
        Token::LBrace => "{",
        Token::RBrace => "}",
        Token::LBracket => "[",
        Token::RBracket => "]",
        Token::Comma => ",",
        Token::Dot => "\u{00b7}",
        Token::Bar => "\u{2223}",
        Token::And => "\u{2227}",
        Token::Or => "\u{2228}",
        Token::Not => "\u{00ac}",
        Token::Implies => "\u{21d2}",
        Token::Equiv => "\u{21d4}",
        Token::Forall => "\u{2200}",
        Token::Exists => "\u{2203}",
        Token::Top => "\u{22a4}",
        Token::Bottom => "\u{22a5}",
        Token::Eq => "=",
        Token::Neq => "\u{2260}",
        Token::Lt => "<",
        Token::Le => "\u{2264}",
        Token::Gt => ">",
        Token::Ge => "\u{2265}",
        Token::In => "\u{2208}",
        Token::NotIn => "\u{2209}",
        Token::Subset => "\u{2286}",
        Token::NotSubset => "\u{2288}",
        Token::StrictSubset => "\u{2282}",
        Token::NotStrictSubset => "\u{2284}",
        Token::Maplet => "\u{21a6}",
        Token::Rel => "\u{2194}",
        Token::PFun => "\u{21f8}",
        Token::TFun => "\u{2192}",
        Token::Union => "\u{222a}",
        Token::Inter => "\u{2229}",
        Token::SetMinus => "\u{2216}",
        Token::Times => "\u{00d7}",
        Token::UpTo => "\u{2025}",
        Token::Plus => "+",
        Token::Minus => "\u{2212}",
        Token::Star => "\u{2217}",
        Token::Div => "\u{00f7}",
        Token::Caret => "^",
        Token::Converse => "\u{223c}",
        Token::Pow => "\u{2119}",
        Token::Integers => "\u{2124}",
        Token::Naturals => "\u{2115}",
        Token::Naturals1 => "\u{2115}1",
        Token::EmptySet => "\u{2205}",
        Token::Eof => "",
    }
}

/// Renders the token as it appears in the source, quoted; end of input
/// renders as `end of input`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{}'", w),
            Token::Keyword(k) => write!(f, "'{}'", k.word()),
            Token::Int(n) => write!(f, "'{}'", n),
            Token::Eof => f.write_str("end of input"),
            other => write!(f, "'{}'", token_text(other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

fn symbol(c: char) -> Option<Token> {
    let t = match c {
        '(' => Token::LParen,
        ')' => Token::RParen,
        '{' => Token::LBrace,
        '}' => Token::RBrace,
        '[' => Token::LBracket,
        ']' => Token::RBracket,
        ',' => Token::Comma,
        '\u{00b7}' => Token::Dot,
        '\u{2223}' => Token::Bar,
        '\u{2227}' => Token::And,
        '\u{2228}' => Token::Or,
        '\u{00ac}' => Token::Not,
        '\u{21d2}' => Token::Implies,
        '\u{21d4}' => Token::Equiv,
        '\u{2200}' => Token::Forall,
        '\u{2203}' => Token::Exists,
        '\u{22a4}' => Token::Top,
        '\u{22a5}' => Token::Bottom,
        '=' => Token::Eq,
        '\u{2260}' => Token::Neq,
        '<' => Token::Lt,
        '\u{2264}' => Token::Le,
        '>' => Token::Gt,
        '\u{2265}' => Token::Ge,
        '\u{2208}' => Token::In,
        '\u{2209}' => Token::NotIn,
        '\u{2286}' => Token::Subset,
        '\u{2288}' => Token::NotSubset,
        '\u{2282}' => Token::StrictSubset,
        '\u{2284}' => Token::NotStrictSubset,
        '\u{21a6}' => Token::Maplet,
        '\u{2194}' => Token::Rel,
        '\u{21f8}' => Token::PFun,
        '\u{2192}' => Token::TFun,
        '\u{222a}' => Token::Union,
        '\u{2229}' => Token::Inter,
        '\u{2216}' => Token::SetMinus,
        '\u{00d7}' => Token::Times,
        '\u{2025}' => Token::UpTo,
        '+' => Token::Plus,
        '\u{2212}' => Token::Minus,
        '\u{2217}' => Token::Star,
        '\u{00f7}' => Token::Div,
        '^' => Token::Caret,
        '\u{223c}' => Token::Converse,
        '\u{2119}' => Token::Pow,
        '\u{2124}' => Token::Integers,
        '\u{2205}' => Token::EmptySet,
        _ => return None,
    };
    Some(t)
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenize normalized formula text. All unexpected characters are
/// reported together; offsets are character (not byte) positions.
pub fn lex(factory: &FormulaFactory, src: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut problems = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        // Number
        if c.is_ascii_digit() {
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            let s: String = chars[start..pos].iter().collect();
            match s.parse::<i64>() {
                Ok(n) => tokens.push(Spanned {
                    token: Token::Int(n),
                    start,
                    end: pos,
                }),
                Err(_) => problems.push(ParseProblem::new(
                    start,
                    format!("integer literal '{}' is out of range", s),
                )),
            }
            continue;
        }

        // ℕ1 is a single token
        if c == '\u{2115}' {
            pos += 1;
            let token = if pos < chars.len() && chars[pos] == '1' {
                pos += 1;
                Token::Naturals1
            } else {
                Token::Naturals
            };
            tokens.push(Spanned {
                token,
                start,
                end: pos,
            });
            continue;
        }

        if let Some(token) = symbol(c) {
            pos += 1;
            tokens.push(Spanned {
                token,
                start,
                end: pos,
            });
            continue;
        }

        // Identifier / keyword
        if is_ident_start(c) {
            while pos < chars.len() && is_ident_continue(chars[pos]) {
                pos += 1;
            }
            if pos < chars.len() && chars[pos] == '\'' {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let token = match factory.keyword(&word) {
                Some(k) => Token::Keyword(k),
                None => Token::Word(word),
            };
            tokens.push(Spanned {
                token,
                start,
                end: pos,
            });
            continue;
        }

        problems.push(ParseProblem::new(
            start,
            format!("unexpected character '{}'", c),
        ));
        pos += 1;
    }

    if !problems.is_empty() {
        return Err(ParseError { problems });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        start: pos,
        end: pos,
    });
    Ok(tokens)
}
