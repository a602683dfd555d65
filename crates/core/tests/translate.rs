//! End-to-end translation through the public API.
//!
//! A small refinement chain (M0 ← M1 ← M2) seeing an extended context
//! (C1 extends C0) is loaded from a JSON snapshot, then formulas are
//! translated against the various roots.

use bterm_core::{
    check, normalize, split_transition, Animator, AnimatorError, DatabaseError, EventBTranslator,
    Formula, FormulaFactory, InMemoryDatabase, ModelDatabase, ModelRoot, ModelSnapshot,
    TranslateError, TypeCheckError, TypeEnvironment,
};

const SNAPSHOT: &str = r#"{
  "contexts": [
    { "name": "C0", "sets": ["COLOUR"], "constants": [{ "name": "red", "type": "COLOUR" }] },
    { "name": "C1", "extends": ["C0"], "constants": [{ "name": "cap", "type": "INT" }] }
  ],
  "machines": [
    { "name": "M0", "sees": ["C0"],
      "variables": [{ "name": "paint", "type": "POW(COLOUR)" }],
      "events": [{ "label": "add", "parameters": [{ "name": "c", "type": "COLOUR" }] }] },
    { "name": "M1", "refines": "M0", "sees": ["C1"],
      "variables": [{ "name": "count", "type": "INT" }],
      "events": [{ "label": "add", "refines": ["add"],
                   "parameters": [{ "name": "k", "type": "INT" }] }] },
    { "name": "M2", "refines": "M1", "sees": ["C1"],
      "variables": [{ "name": "log", "type": "POW(INT ** COLOUR)" }],
      "events": [{ "label": "add", "refines": ["add"] },
                 { "label": "tick" }] }
  ]
}"#;

fn db() -> InMemoryDatabase {
    InMemoryDatabase::from_snapshot(ModelSnapshot::from_json_str(SNAPSHOT).unwrap())
}

fn machine(name: &str) -> ModelRoot {
    ModelRoot::Machine(name.into())
}

// ──────────────────────────────────────────────
// Expressions and predicates
// ──────────────────────────────────────────────

#[test]
fn expression_over_context_constants() {
    let db = db();
    let t = EventBTranslator::new(&db, ModelRoot::Context("C1".into()));
    let term = t.translate_expression("cap + 1", true).unwrap();
    assert_eq!(
        term.to_string(),
        "bexpr(add(none,identifier(none,cap),integer(none,1)))"
    );
}

#[test]
fn predicate_mentions_seen_and_extended_context_names() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M1"));
    let term = t
        .translate_predicate("count <= cap & red : COLOUR", true)
        .unwrap();
    assert_eq!(term.functor(), Some("bpred"));
    assert_eq!(term.args()[0].functor(), Some("conjunct"));
}

#[test]
fn abstract_variables_are_not_present_state() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M1"));
    let err = t.translate_predicate("paint = {red}", true).unwrap_err();
    assert_eq!(
        err,
        TranslateError::TypeCheck(TypeCheckError::UnknownIdentifiers(vec!["paint".into()]))
    );
}

#[test]
fn type_mismatch_surfaces_the_first_problem_only() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M1"));
    match t.translate_predicate("count = red & cap = red", true) {
        Err(TranslateError::TypeCheck(TypeCheckError::Problem(p))) => {
            assert_eq!(p.offset, 8);
            assert_eq!(p.message, "type mismatch: expected \u{2124}, found COLOUR");
        }
        other => panic!("expected a type problem, got {:?}", other),
    }
}

#[test]
fn parse_errors_carry_every_lexer_problem() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M1"));
    match t.translate_predicate("count @ 1 $ 2", true) {
        Err(TranslateError::Parse(e)) => assert_eq!(e.problems.len(), 2),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn wrap_flag_controls_outer_functor() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M2"));
    let wrapped = t.translate_expression("dom(log)", true).unwrap();
    let bare = t.translate_expression("dom(log)", false).unwrap();
    assert_eq!(wrapped.args()[0], bare);
    assert_eq!(bare.to_string(), "domain(none,identifier(none,log))");
}

#[test]
fn translating_twice_yields_equal_terms() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M2"));
    let first = t.translate_expression("{n \u{00b7} n : dom(log) | n |-> red}", true).unwrap();
    let second = t.translate_expression("{n \u{00b7} n : dom(log) | n |-> red}", true).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());

    let p1 = t.translate_predicate("!x.(x : dom(log) => x <= cap)", false).unwrap();
    let p2 = t.translate_predicate("!x.(x : dom(log) => x <= cap)", false).unwrap();
    assert_eq!(p1, p2);
}

// ──────────────────────────────────────────────
// Transitions
// ──────────────────────────────────────────────

#[test]
fn transition_sees_the_whole_primed_chain() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M2"));
    let term = t
        .translate_transition_predicate("tick | count' = cap & paint' = {red} & log' = log", true)
        .unwrap();
    let s = term.to_string();
    assert!(s.starts_with("btrans(event(tick,"), "{}", s);
    assert!(s.contains("identifier(none,'paint\\'')"), "{}", s);
}

#[test]
fn refined_event_does_not_inherit_abstract_parameters() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M2"));
    let err = t
        .translate_transition_predicate("add | k > 0", true)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown identifier: [k]");

    let t1 = EventBTranslator::new(&db, machine("M1"));
    assert!(t1.translate_transition_predicate("add | k > 0", true).is_ok());
}

#[test]
fn transition_name_is_trimmed_and_predicate_split_once() {
    assert_eq!(
        split_transition("  tick |count' = 0"),
        ("tick".to_owned(), Some("count' = 0".to_owned()))
    );
    let db = db();
    let t = EventBTranslator::new(&db, machine("M2"));
    assert_eq!(
        t.translate_transition_predicate("  tick  ", false)
            .unwrap()
            .to_string(),
        "event(tick)"
    );
}

#[test]
fn compiled_machine_root_rejects_transitions() {
    let db = db();
    let t = EventBTranslator::new(&db, ModelRoot::CompiledMachine("M2".into()));
    assert!(matches!(
        t.translate_transition_predicate("tick", true),
        Err(TranslateError::UnsupportedOperation(_))
    ));
}

// ──────────────────────────────────────────────
// Collaborators
// ──────────────────────────────────────────────

struct BrokenDatabase;

impl ModelDatabase for BrokenDatabase {
    fn compiled_machine(&self, name: &str) -> Result<bterm_core::CompiledMachine, DatabaseError> {
        Err(DatabaseError::Corrupt(format!("{}.bcm", name)))
    }

    fn compiled_context(&self, name: &str) -> Result<bterm_core::CompiledContext, DatabaseError> {
        Err(DatabaseError::Corrupt(format!("{}.bcc", name)))
    }
}

#[test]
fn database_failures_become_model_access_errors() {
    let t = EventBTranslator::new(&BrokenDatabase, machine("M0"));
    let err = t.translate_predicate("\u{22a4}", true).unwrap_err();
    assert_eq!(err.kind(), "model_access");
    assert_eq!(
        err.to_string(),
        "Error in the underlying model database.\nTry cleaning your workspace.\n Details: corrupt model element: M0.bcm"
    );
}

#[test]
fn trait_object_database_is_accepted() {
    let db = db();
    let dyn_db: &dyn ModelDatabase = &db;
    let t = EventBTranslator::new(dyn_db, ModelRoot::Context("C0".into()));
    assert!(t.translate_expression("red", true).is_ok());
}

#[derive(Default)]
struct CountingAnimator {
    loads: usize,
}

impl Animator for CountingAnimator {
    fn load_model(&mut self, _root: &ModelRoot) -> Result<(), AnimatorError> {
        self.loads += 1;
        Ok(())
    }
}

#[test]
fn reload_delegates_to_animator() {
    let db = db();
    let t = EventBTranslator::new(&db, machine("M0"));
    let mut animator = CountingAnimator::default();
    t.reload(&mut animator).unwrap();
    t.reload(&mut animator).unwrap();
    assert_eq!(animator.loads, 2);
}

// ──────────────────────────────────────────────
// Pipeline pieces
// ──────────────────────────────────────────────

#[test]
fn normalization_is_idempotent_on_translated_inputs() {
    for text in ["count <= cap & red : COLOUR", "!x.(x : NAT => x >= 0)", "a |-> b"] {
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn raw_check_reports_inferred_names_with_types() {
    let ff = FormulaFactory::default();
    let pred = ff.parse_predicate(&normalize("y : NAT")).unwrap();
    let result = check(&Formula::Predicate(pred), &TypeEnvironment::new());
    assert!(result.problems.is_empty());
    assert_eq!(
        result.inferred.get("y"),
        Some(&Some(bterm_core::Type::Integer))
    );
}
