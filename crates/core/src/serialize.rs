//! AST → wire term.
//!
//! Every node becomes `functor(none, children...)`, `none` standing in for
//! the source position the engine's term format expects. Identifier lists
//! of binders are emitted as lists of `identifier` terms.

use crate::ast::*;
use crate::term::WireTerm;

pub const EXPR_WRAPPER: &str = "bexpr";
pub const PRED_WRAPPER: &str = "bpred";
pub const TRANS_WRAPPER: &str = "btrans";
pub const EVENT_TERM: &str = "event";

const NO_POSITION: &str = "none";

/// Serialize `formula`, wrapping the result as `wrapper(term)` when `wrap`
/// is set.
pub fn serialize(formula: &Formula, wrap: bool, wrapper: &str) -> WireTerm {
    let term = match formula {
        Formula::Expression(e) => expr_term(e),
        Formula::Predicate(p) => pred_term(p),
    };
    wrap_term(term, wrap, wrapper)
}

pub fn wrap_term(term: WireTerm, wrap: bool, wrapper: &str) -> WireTerm {
    if wrap {
        WireTerm::compound(wrapper, vec![term])
    } else {
        term
    }
}

fn node(functor: &str, children: Vec<WireTerm>) -> WireTerm {
    let mut args = Vec::with_capacity(children.len() + 1);
    args.push(WireTerm::atom(NO_POSITION));
    args.extend(children);
    WireTerm::compound(functor, args)
}

fn identifier(name: &str) -> WireTerm {
    node("identifier", vec![WireTerm::atom(name)])
}

fn bound_list(bound: &[BoundIdent]) -> WireTerm {
    WireTerm::List(bound.iter().map(|b| identifier(&b.name)).collect())
}

// ── Expressions ──────────────────────────────

pub fn expr_term(e: &Expr) -> WireTerm {
    match &e.kind {
        ExprKind::Identifier(name) => identifier(name),
        ExprKind::Integer(n) => node("integer", vec![WireTerm::Integer(*n)]),
        ExprKind::Atomic(a) => node(atomic_functor(*a), vec![]),
        ExprKind::Binary {
            op: BinaryOp::Maplet,
            left,
            right,
        } => node(
            "couple",
            vec![WireTerm::List(vec![expr_term(left), expr_term(right)])],
        ),
        ExprKind::Binary { op, left, right } => {
            node(binary_functor(*op), vec![expr_term(left), expr_term(right)])
        }
        ExprKind::Unary { op, operand } => node(unary_functor(*op), vec![expr_term(operand)]),
        ExprKind::Apply { function, argument } => node(
            "function",
            vec![expr_term(function), WireTerm::List(vec![expr_term(argument)])],
        ),
        ExprKind::Image { relation, set } => {
            node("image", vec![expr_term(relation), expr_term(set)])
        }
        ExprKind::SetExtension(members) => node(
            "set_extension",
            vec![WireTerm::List(members.iter().map(expr_term).collect())],
        ),
        ExprKind::Comprehension {
            bound,
            predicate,
            expression,
        } => node(
            "event_b_comprehension_set",
            vec![bound_list(bound), expr_term(expression), pred_term(predicate)],
        ),
        ExprKind::Bool(p) => node("convert_bool", vec![pred_term(p)]),
    }
}

fn atomic_functor(a: AtomicExpr) -> &'static str {
    match a {
        AtomicExpr::True => "boolean_true",
        AtomicExpr::False => "boolean_false",
        AtomicExpr::BoolSet => "bool_set",
        AtomicExpr::Integers => "integer_set",
        AtomicExpr::Naturals => "natural_set",
        AtomicExpr::Naturals1 => "natural1_set",
        AtomicExpr::EmptySet => "empty_set",
    }
}

fn binary_functor(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Maplet => "couple",
        BinaryOp::Relation => "relations",
        BinaryOp::PartialFunction => "partial_function",
        BinaryOp::TotalFunction => "total_function",
        BinaryOp::Union => "union",
        BinaryOp::Intersection => "intersection",
        BinaryOp::SetMinus => "set_subtraction",
        BinaryOp::Cartesian => "cartesian_product",
        BinaryOp::UpTo => "interval",
        BinaryOp::Plus => "add",
        BinaryOp::Minus => "minus",
        BinaryOp::Mul => "multiplication",
        BinaryOp::Div => "div",
        BinaryOp::Mod => "modulo",
        BinaryOp::Expn => "power_of",
    }
}

fn unary_functor(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Negate => "unary_minus",
        UnaryOp::PowerSet => "pow_subset",
        UnaryOp::Card => "card",
        UnaryOp::Dom => "domain",
        UnaryOp::Ran => "range",
        UnaryOp::Min => "min",
        UnaryOp::Max => "max",
        UnaryOp::Converse => "reverse",
    }
}

// ── Predicates ───────────────────────────────

pub fn pred_term(p: &Pred) -> WireTerm {
    match &p.kind {
        PredKind::Literal(true) => node("truth", vec![]),
        PredKind::Literal(false) => node("falsity", vec![]),
        PredKind::Binary { op, left, right } => {
            let functor = match op {
                LogicOp::And => "conjunct",
                LogicOp::Or => "disjunct",
                LogicOp::Implies => "implication",
                LogicOp::Equiv => "equivalence",
            };
            node(functor, vec![pred_term(left), pred_term(right)])
        }
        PredKind::Not(inner) => node("negation", vec![pred_term(inner)]),
        PredKind::Quantified {
            quantifier,
            bound,
            body,
        } => {
            let functor = match quantifier {
                Quantifier::Forall => "forall",
                Quantifier::Exists => "exists",
            };
            node(functor, vec![bound_list(bound), pred_term(body)])
        }
        PredKind::Relation { op, left, right } => {
            node(relation_functor(*op), vec![expr_term(left), expr_term(right)])
        }
        PredKind::Finite(e) => node("finite", vec![expr_term(e)]),
    }
}

fn relation_functor(op: RelOp) -> &'static str {
    match op {
        RelOp::Eq => "equal",
        RelOp::Neq => "not_equal",
        RelOp::Lt => "less",
        RelOp::Le => "less_equal",
        RelOp::Gt => "greater",
        RelOp::Ge => "greater_equal",
        RelOp::In => "member",
        RelOp::NotIn => "not_member",
        RelOp::Subset => "subset",
        RelOp::NotSubset => "not_subset",
        RelOp::StrictSubset => "subset_strict",
        RelOp::NotStrictSubset => "not_subset_strict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::FormulaFactory;

    fn pred(src: &str) -> Formula {
        Formula::Predicate(FormulaFactory::default().parse_predicate(src).unwrap())
    }

    fn expr(src: &str) -> Formula {
        Formula::Expression(FormulaFactory::default().parse_expression(src).unwrap())
    }

    #[test]
    fn wrapped_expression() {
        let t = serialize(&expr("x + 1"), true, EXPR_WRAPPER);
        assert_eq!(
            t.to_string(),
            "bexpr(add(none,identifier(none,x),integer(none,1)))"
        );
    }

    #[test]
    fn unwrapped_predicate_has_no_outer_wrapper() {
        let t = serialize(&pred("\u{22a4}"), false, PRED_WRAPPER);
        assert_eq!(t.to_string(), "truth(none)");
    }

    #[test]
    fn maplet_and_application_use_lists() {
        let t = serialize(&expr("f(a \u{21a6} b)"), false, EXPR_WRAPPER);
        assert_eq!(
            t.to_string(),
            "function(none,identifier(none,f),[couple(none,[identifier(none,a),identifier(none,b)])])"
        );
    }

    #[test]
    fn quantifier_lists_bound_identifiers() {
        let t = serialize(&pred("\u{2200}x, y\u{00b7}x < y"), true, PRED_WRAPPER);
        assert_eq!(
            t.to_string(),
            "bpred(forall(none,[identifier(none,x),identifier(none,y)],\
             less(none,identifier(none,x),identifier(none,y))))"
        );
    }

    #[test]
    fn comprehension_puts_expression_before_predicate() {
        let t = serialize(
            &expr("{z \u{00b7} z \u{2208} \u{2115} \u{2223} z \u{2217} 2}"),
            false,
            EXPR_WRAPPER,
        );
        assert_eq!(
            t.to_string(),
            "event_b_comprehension_set(none,[identifier(none,z)],\
             multiplication(none,identifier(none,z),integer(none,2)),\
             member(none,identifier(none,z),natural_set(none)))"
        );
    }

    #[test]
    fn primed_and_uppercase_names_are_quoted() {
        let t = serialize(&pred("x' = S"), false, PRED_WRAPPER);
        assert_eq!(
            t.to_string(),
            "equal(none,identifier(none,'x\\''),identifier(none,'S'))"
        );
    }

    #[test]
    fn serializing_one_tree_twice_is_stable() {
        let f = expr("card(r[{a}]) + min(1\u{2025}n)");
        assert_eq!(serialize(&f, true, EXPR_WRAPPER), serialize(&f, true, EXPR_WRAPPER));
        let p = pred("\u{2203}y\u{00b7}y \u{2208} s \u{2227} \u{00ac}(y = 0)");
        assert_eq!(serialize(&p, false, PRED_WRAPPER), serialize(&p, false, PRED_WRAPPER));
    }
}
