//! Translator facade.
//!
//! [`EventBTranslator`] turns user-entered text into wire terms for one
//! model root: normalize, parse, build the environment, type-check,
//! serialize. Nothing is cached between calls; each call reads the model
//! afresh through the database.

use tracing::{debug, warn};

use crate::ast::Formula;
use crate::environment::build_environment;
use crate::error::{AnimatorError, TranslateError};
use crate::factory::FormulaFactory;
use crate::model::{ModelDatabase, ModelRoot};
use crate::normalize::normalize;
use crate::serialize::{serialize, EXPR_WRAPPER, PRED_WRAPPER};
use crate::term::WireTerm;
use crate::transition::parse_transition;
use crate::typecheck::check;

/// Animation session that can (re)load a model.
pub trait Animator {
    fn load_model(&mut self, root: &ModelRoot) -> Result<(), AnimatorError>;
}

pub struct EventBTranslator<'d, D: ModelDatabase + ?Sized> {
    factory: FormulaFactory,
    db: &'d D,
    root: ModelRoot,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    Expression,
    Predicate,
}

impl<'d, D: ModelDatabase + ?Sized> EventBTranslator<'d, D> {
    pub fn new(db: &'d D, root: ModelRoot) -> Self {
        Self::with_factory(FormulaFactory::default(), db, root)
    }

    pub fn with_factory(factory: FormulaFactory, db: &'d D, root: ModelRoot) -> Self {
        EventBTranslator { factory, db, root }
    }

    pub fn root(&self) -> &ModelRoot {
        &self.root
    }

    pub fn factory(&self) -> &FormulaFactory {
        &self.factory
    }

    pub fn translate_expression(&self, text: &str, wrap: bool) -> Result<WireTerm, TranslateError> {
        self.translate(Entry::Expression, text, wrap)
    }

    pub fn translate_predicate(&self, text: &str, wrap: bool) -> Result<WireTerm, TranslateError> {
        self.translate(Entry::Predicate, text, wrap)
    }

    /// Translate `event` or `event | predicate`. Only source machine roots
    /// accept transitions.
    pub fn translate_transition_predicate(
        &self,
        text: &str,
        wrap: bool,
    ) -> Result<WireTerm, TranslateError> {
        debug!(root = %self.root, text, "translating transition");
        parse_transition(&self.factory, self.db, &self.root, text, wrap)
            .inspect_err(|e| warn!(kind = e.kind(), "transition rejected: {}", e))
    }

    /// Ask the animator to load this translator's root again.
    pub fn reload<A: Animator + ?Sized>(&self, animator: &mut A) -> Result<(), AnimatorError> {
        debug!(root = %self.root, "reloading model");
        animator.load_model(&self.root)
    }

    fn translate(&self, entry: Entry, text: &str, wrap: bool) -> Result<WireTerm, TranslateError> {
        debug!(root = %self.root, ?entry, text, "translating");
        self.translate_inner(entry, text, wrap)
            .inspect_err(|e| warn!(kind = e.kind(), ?entry, "formula rejected: {}", e))
    }

    fn translate_inner(
        &self,
        entry: Entry,
        text: &str,
        wrap: bool,
    ) -> Result<WireTerm, TranslateError> {
        let normalized = normalize(text);
        let formula = match entry {
            Entry::Expression => Formula::Expression(self.factory.parse_expression(&normalized)?),
            Entry::Predicate => Formula::Predicate(self.factory.parse_predicate(&normalized)?),
        };
        let env = build_environment(self.db, &self.root)?;
        check(&formula, &env).into_result()?;

        let wrapper = match entry {
            Entry::Expression => EXPR_WRAPPER,
            Entry::Predicate => PRED_WRAPPER,
        };
        Ok(serialize(&formula, wrap, wrapper))
    }
}
