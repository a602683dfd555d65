//! Wire terms handed to the animation engine.
//!
//! A [`WireTerm`] prints as Prolog text through `Display` and as JSON
//! through serde (atoms as strings, compounds as `{"functor", "args"}`).

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireTerm {
    Atom(String),
    Integer(i64),
    List(Vec<WireTerm>),
    Compound { functor: String, args: Vec<WireTerm> },
}

impl WireTerm {
    pub fn atom(name: impl Into<String>) -> WireTerm {
        WireTerm::Atom(name.into())
    }

    pub fn compound(functor: impl Into<String>, args: Vec<WireTerm>) -> WireTerm {
        WireTerm::Compound {
            functor: functor.into(),
            args,
        }
    }

    /// Functor name for compounds, the atom itself for atoms.
    pub fn functor(&self) -> Option<&str> {
        match self {
            WireTerm::Atom(a) => Some(a),
            WireTerm::Compound { functor, .. } => Some(functor),
            _ => None,
        }
    }

    pub fn args(&self) -> &[WireTerm] {
        match self {
            WireTerm::Compound { args, .. } => args,
            WireTerm::List(items) => items,
            _ => &[],
        }
    }
}

/// Atoms that need no quoting: lowercase letter, then letters, digits, `_`.
fn is_plain_atom(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn write_atom(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_plain_atom(name) {
        return f.write_str(name);
    }
    f.write_str("'")?;
    for c in name.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str("'")
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[WireTerm]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for WireTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireTerm::Atom(a) => write_atom(f, a),
            WireTerm::Integer(n) => write!(f, "{}", n),
            WireTerm::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            WireTerm::Compound { functor, args } => {
                write_atom(f, functor)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("(")?;
                write_seq(f, args)?;
                f.write_str(")")
            }
        }
    }
}
