//! bterm-core: Event-B formula translation core.
//!
//! Turns user-entered formula text into the nested wire terms consumed by
//! an animation engine:
//!
//! text → [`normalize()`] → lexer → parser → AST → [`build_environment()`]
//! → type checker → [`serialize()`] → [`WireTerm`]
//!
//! # Public API
//!
//! - [`EventBTranslator`] -- expression, predicate and transition entry points
//! - [`FormulaFactory`] -- parsing context (reserved words, grammar entry points)
//! - [`ModelDatabase`] / [`InMemoryDatabase`] -- read access to compiled models
//! - [`Animator`] -- the animation session collaborator
//! - [`TranslateError`] -- every failure, one kind per cause
//!
//! The individual steps are public as well for callers that only need part
//! of the pipeline.

pub mod ast;
pub mod environment;
pub mod error;
pub mod factory;
pub mod lexer;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod serialize;
pub mod term;
pub mod transition;
pub mod translate;
pub mod typecheck;
pub mod types;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::Formula;
pub use error::{
    AnimatorError, DatabaseError, ModelAccessError, ParseError, ParseProblem, TranslateError,
    TypeCheckError, TypeProblem,
};
pub use factory::FormulaFactory;
pub use model::{
    CompiledContext, CompiledEvent, CompiledMachine, Identifier, InMemoryDatabase, ModelDatabase,
    ModelRoot, ModelSnapshot, SnapshotError,
};
pub use term::WireTerm;
pub use translate::{Animator, EventBTranslator};
pub use types::{Type, TypeEnvironment};

// ── Convenience re-exports: pipeline steps ───────────────────────────

pub use environment::build_environment;
pub use normalize::normalize;
pub use serialize::serialize;
pub use transition::{parse_transition, split_transition};
pub use typecheck::{check, typecheck};
