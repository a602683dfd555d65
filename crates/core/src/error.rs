//! Error types for the translation pipeline.
//!
//! Every failure inside the core is converted into exactly one
//! [`TranslateError`] kind before it reaches a caller. Collaborator errors
//! ([`DatabaseError`]) are wrapped, never passed through raw.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single syntactic problem, located by character offset into the
/// normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseProblem {
    pub offset: usize,
    pub message: String,
}

impl ParseProblem {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        ParseProblem {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.offset)
    }
}

/// The grammar rejected the text. Carries every problem the lexer and
/// parser collected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_list(.problems))]
pub struct ParseError {
    pub problems: Vec<ParseProblem>,
}

impl ParseError {
    pub fn single(offset: usize, message: impl Into<String>) -> Self {
        ParseError {
            problems: vec![ParseProblem::new(offset, message)],
        }
    }
}

/// A problem reported by the type checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeProblem {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for TypeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.offset)
    }
}

/// Type checking failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeCheckError {
    /// The first problem reported by the checker. Later problems are
    /// dropped so the user fixes one issue at a time.
    #[error("{0}")]
    Problem(TypeProblem),

    /// Names the checker had to infer because they were not declared.
    #[error("unknown identifier: {}", render_list(.0))]
    UnknownIdentifiers(Vec<String>),
}

/// The model database failed underneath the environment builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error in the underlying model database.\nTry cleaning your workspace.\n Details: {cause}")]
pub struct ModelAccessError {
    pub cause: String,
}

impl From<DatabaseError> for ModelAccessError {
    fn from(e: DatabaseError) -> Self {
        ModelAccessError {
            cause: e.to_string(),
        }
    }
}

/// Errors raised by a [`crate::model::ModelDatabase`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("machine not found: {0}")]
    MachineNotFound(String),

    #[error("context not found: {0}")]
    ContextNotFound(String),

    /// The stored element exists but could not be read.
    #[error("corrupt model element: {0}")]
    Corrupt(String),
}

/// Errors raised by an [`crate::translate::Animator`] while reloading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("animator error: {0}")]
pub struct AnimatorError(pub String);

/// Every error the translation facade can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    TypeCheck(#[from] TypeCheckError),

    #[error("unknown event {0}")]
    UnknownEvent(String),

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    ModelAccess(#[from] ModelAccessError),
}

impl TranslateError {
    /// Stable machine-readable kind, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::Parse(_) => "parse",
            TranslateError::TypeCheck(_) => "typecheck",
            TranslateError::UnknownEvent(_) => "unknown_event",
            TranslateError::UnsupportedOperation(_) => "unsupported_operation",
            TranslateError::ModelAccess(_) => "model_access",
        }
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "message": self.to_string(),
        })
    }
}

fn render_list<T: fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
