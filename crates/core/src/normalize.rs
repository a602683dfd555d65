//! Text normalizer: ASCII notation to the mathematical concrete syntax.
//!
//! Users type `x : NAT & y /= 0`; the grammar expects `x ∈ ℕ ∧ y ≠ 0`.
//! The rewrite is token-aware so identifiers are never split (`order` keeps
//! its `or`), and it leaves text already in mathematical notation alone,
//! which makes it idempotent.

use crate::lexer::{is_ident_continue, is_ident_start};

/// ASCII words replaced as whole identifiers.
const WORDS: &[(&str, &str)] = &[
    ("or", "\u{2228}"),
    ("not", "\u{00ac}"),
    ("POW", "\u{2119}"),
    ("INT", "\u{2124}"),
    ("NAT", "\u{2115}"),
    ("NAT1", "\u{2115}1"),
    ("true", "\u{22a4}"),
    ("false", "\u{22a5}"),
];

/// ASCII symbol sequences, longest first so that `<=>` wins over `<=`.
const SYMBOLS: &[(&str, &str)] = &[
    ("/<<:", "\u{2284}"),
    ("<=>", "\u{21d4}"),
    ("|->", "\u{21a6}"),
    ("<->", "\u{2194}"),
    ("+->", "\u{21f8}"),
    ("-->", "\u{2192}"),
    ("<<:", "\u{2282}"),
    ("/<:", "\u{2288}"),
    ("=>", "\u{21d2}"),
    ("/=", "\u{2260}"),
    ("<=", "\u{2264}"),
    (">=", "\u{2265}"),
    ("/:", "\u{2209}"),
    ("<:", "\u{2286}"),
    ("\\/", "\u{222a}"),
    ("/\\", "\u{2229}"),
    ("**", "\u{00d7}"),
    ("..", "\u{2025}"),
    ("{}", "\u{2205}"),
    ("&", "\u{2227}"),
    ("!", "\u{2200}"),
    ("#", "\u{2203}"),
    (".", "\u{00b7}"),
    (":", "\u{2208}"),
    ("\\", "\u{2216}"),
    ("-", "\u{2212}"),
    ("*", "\u{2217}"),
    ("/", "\u{00f7}"),
    ("~", "\u{223c}"),
    ("|", "\u{2223}"),
];

fn starts_with_at(chars: &[char], pos: usize, pattern: &str) -> bool {
    let mut i = pos;
    for pc in pattern.chars() {
        if i >= chars.len() || chars[i] != pc {
            return false;
        }
        i += 1;
    }
    true
}

/// Rewrite user-facing ASCII notation into the grammar's tokens.
pub fn normalize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0usize;

    'scan: while pos < chars.len() {
        let c = chars[pos];

        if is_ident_start(c) {
            let start = pos;
            while pos < chars.len() && is_ident_continue(chars[pos]) {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            match WORDS.iter().find(|(ascii, _)| *ascii == word) {
                Some((_, replacement)) => out.push_str(replacement),
                None => out.push_str(&word),
            }
            // priming belongs to the identifier, not to the symbol table
            if pos < chars.len() && chars[pos] == '\'' {
                out.push('\'');
                pos += 1;
            }
            continue;
        }

        for (ascii, replacement) in SYMBOLS {
            if starts_with_at(&chars, pos, ascii) {
                out.push_str(replacement);
                pos += ascii.chars().count();
                continue 'scan;
            }
        }

        out.push(c);
        pos += 1;
    }

    out
}
