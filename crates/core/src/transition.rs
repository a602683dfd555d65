//! Transition predicates: `event` or `event | predicate`.
//!
//! The predicate side may mention the event's parameters and the primed
//! (post-state) variables of the machine and all of its abstractions.

use tracing::debug;

use crate::environment::{add_event_parameters, add_post_state_variables, build_environment};
use crate::error::{ModelAccessError, TranslateError};
use crate::factory::FormulaFactory;
use crate::model::{ModelDatabase, ModelRoot};
use crate::normalize::normalize;
use crate::serialize::{pred_term, wrap_term, EVENT_TERM, TRANS_WRAPPER};
use crate::term::WireTerm;
use crate::typecheck::check_predicate;

/// Split at the first `|`. The event name is trimmed; the predicate text is
/// kept verbatim.
pub fn split_transition(raw: &str) -> (String, Option<String>) {
    match raw.split_once('|') {
        Some((event, predicate)) => (event.trim().to_owned(), Some(predicate.to_owned())),
        None => (raw.trim().to_owned(), None),
    }
}

pub fn parse_transition<D: ModelDatabase + ?Sized>(
    factory: &FormulaFactory,
    db: &D,
    root: &ModelRoot,
    raw: &str,
    wrap: bool,
) -> Result<WireTerm, TranslateError> {
    let ModelRoot::Machine(machine_name) = root else {
        return Err(TranslateError::UnsupportedOperation(
            "predicates on transitions are only supported when animating machines".into(),
        ));
    };

    let (event_name, predicate) = split_transition(raw);
    let machine = db
        .compiled_machine(machine_name)
        .map_err(ModelAccessError::from)?;
    let event = machine
        .event(&event_name)
        .ok_or_else(|| TranslateError::UnknownEvent(event_name.clone()))?;

    let mut args = vec![WireTerm::atom(event_name.as_str())];
    if let Some(text) = predicate {
        let pred = factory.parse_predicate(&normalize(&text))?;
        let mut env = build_environment(db, root)?;
        add_event_parameters(&mut env, event);
        add_post_state_variables(db, &machine, &mut env)?;
        debug!(event = %event_name, names = env.len(), "transition environment ready");

        check_predicate(&pred, &env).into_result()?;
        args.push(pred_term(&pred));
    }

    Ok(wrap_term(
        WireTerm::compound(EVENT_TERM, args),
        wrap,
        TRANS_WRAPPER,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypeCheckError;
    use crate::model::{CompiledEvent, CompiledMachine, Identifier, InMemoryDatabase};
    use crate::types::Type;

    fn db() -> InMemoryDatabase {
        let m0 = CompiledMachine {
            name: "M0".into(),
            variables: vec![Identifier::new("a", Type::Integer)],
            events: vec![],
            refines: None,
            sees: vec![],
        };
        let m1 = CompiledMachine {
            name: "M1".into(),
            variables: vec![Identifier::new("x", Type::Integer)],
            events: vec![
                CompiledEvent {
                    label: "inc".into(),
                    parameters: vec![Identifier::new("d", Type::Integer)],
                    refines: vec![],
                },
                CompiledEvent {
                    label: "reset".into(),
                    parameters: vec![],
                    refines: vec!["init".into()],
                },
            ],
            refines: Some("M0".into()),
            sees: vec![],
        };
        InMemoryDatabase::new().with_machine(m0).with_machine(m1)
    }

    fn run(root: &ModelRoot, raw: &str, wrap: bool) -> Result<WireTerm, TranslateError> {
        parse_transition(&FormulaFactory::default(), &db(), root, raw, wrap)
    }

    fn m1() -> ModelRoot {
        ModelRoot::Machine("M1".into())
    }

    #[test]
    fn split_on_first_bar_only() {
        assert_eq!(
            split_transition(" inc | d = 1 | x"),
            ("inc".to_owned(), Some(" d = 1 | x".to_owned()))
        );
        assert_eq!(split_transition("  inc  "), ("inc".to_owned(), None));
        assert_eq!(split_transition("inc|"), ("inc".to_owned(), Some(String::new())));
    }

    #[test]
    fn bare_event_is_wrapped() {
        let t = run(&m1(), "inc", true).unwrap();
        assert_eq!(t.to_string(), "btrans(event(inc))");
    }

    #[test]
    fn parameters_and_primed_chain_are_visible() {
        let t = run(&m1(), "inc | x' = x + d & a' = a", false).unwrap();
        assert_eq!(t.functor(), Some(EVENT_TERM));
        assert_eq!(t.args().len(), 2);
        assert_eq!(t.args()[1].functor(), Some("conjunct"));
    }

    #[test]
    fn unknown_event_without_predicate_is_rejected() {
        let err = run(&m1(), "nope", true).unwrap_err();
        assert_eq!(err, TranslateError::UnknownEvent("nope".into()));
        assert_eq!(err.to_string(), "unknown event nope");
    }

    #[test]
    fn unknown_event_is_reported_before_parsing() {
        let err = run(&m1(), "nope | ((", true).unwrap_err();
        assert!(matches!(err, TranslateError::UnknownEvent(_)));
    }

    #[test]
    fn non_machine_roots_are_unsupported() {
        for root in [
            ModelRoot::CompiledMachine("M1".into()),
            ModelRoot::Context("C0".into()),
            ModelRoot::CompiledContext("C0".into()),
        ] {
            let err = run(&root, "inc", true).unwrap_err();
            assert_eq!(
                err.to_string(),
                "predicates on transitions are only supported when animating machines"
            );
        }
    }

    #[test]
    fn abstract_event_parameters_are_not_visible() {
        let err = run(&m1(), "reset | d = 0", true).unwrap_err();
        assert_eq!(
            err,
            TranslateError::TypeCheck(TypeCheckError::UnknownIdentifiers(vec!["d".into()]))
        );
    }

    #[test]
    fn unprimed_abstract_variable_is_unknown() {
        let err = run(&m1(), "inc | a = 0", true).unwrap_err();
        assert_eq!(err.to_string(), "unknown identifier: [a]");
    }

    #[test]
    fn missing_machine_is_a_model_access_error() {
        let err = run(&ModelRoot::Machine("M9".into()), "inc", true).unwrap_err();
        assert!(matches!(err, TranslateError::ModelAccess(_)));
    }
}
