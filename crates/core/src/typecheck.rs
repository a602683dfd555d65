//! Type inference and checking.
//!
//! Unification over type variables, seeded by a [`TypeEnvironment`]. Names
//! that are neither bound by a quantifier nor present in the environment
//! are given a fresh type and reported in the inferred set; the translator
//! treats any inferred name as an unknown identifier.

use std::collections::{BTreeMap, HashSet};

use crate::ast::*;
use crate::error::{TypeCheckError, TypeProblem};
use crate::types::{Type, TypeEnvironment};

/// Raw outcome of a check: every problem in discovery order plus every
/// name the checker had to invent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheckResult {
    pub problems: Vec<TypeProblem>,
    /// Undeclared names with their inferred type, `None` when the type could
    /// not be determined either.
    pub inferred: BTreeMap<String, Option<Type>>,
}

impl TypeCheckResult {
    pub fn has_problem(&self) -> bool {
        !self.problems.is_empty()
    }

    /// Reduce to the strict verdict: the first problem, else the inferred
    /// names, else success.
    pub fn into_result(self) -> Result<(), TypeCheckError> {
        if let Some(first) = self.problems.into_iter().next() {
            return Err(TypeCheckError::Problem(first));
        }
        if !self.inferred.is_empty() {
            return Err(TypeCheckError::UnknownIdentifiers(
                self.inferred.into_keys().collect(),
            ));
        }
        Ok(())
    }
}

pub fn check(formula: &Formula, env: &TypeEnvironment) -> TypeCheckResult {
    match formula {
        Formula::Expression(e) => check_expression(e, env),
        Formula::Predicate(p) => check_predicate(p, env),
    }
}

pub fn check_expression(e: &Expr, env: &TypeEnvironment) -> TypeCheckResult {
    let mut c = Checker::new(env);
    let t = c.expr(e);
    c.pending.push((e.span.start, "expression".to_owned(), t));
    c.finish()
}

pub fn check_predicate(p: &Pred, env: &TypeEnvironment) -> TypeCheckResult {
    let mut c = Checker::new(env);
    c.pred(p);
    c.finish()
}

/// Strict check: any problem or any undeclared name is an error.
pub fn typecheck(formula: &Formula, env: &TypeEnvironment) -> Result<(), TypeCheckError> {
    check(formula, env).into_result()
}

// ──────────────────────────────────────────────
// Inference types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Ty {
    Integer,
    Boolean,
    Given(String),
    Power(Box<Ty>),
    Product(Box<Ty>, Box<Ty>),
    Var(usize),
}

fn pow(t: Ty) -> Ty {
    Ty::Power(Box::new(t))
}

fn prod(l: Ty, r: Ty) -> Ty {
    Ty::Product(Box::new(l), Box::new(r))
}

impl From<&Type> for Ty {
    fn from(t: &Type) -> Ty {
        match t {
            Type::Integer => Ty::Integer,
            Type::Boolean => Ty::Boolean,
            Type::Given(n) => Ty::Given(n.clone()),
            Type::Power(inner) => pow(Ty::from(inner.as_ref())),
            Type::Product(l, r) => prod(Ty::from(l.as_ref()), Ty::from(r.as_ref())),
        }
    }
}

struct Checker<'a> {
    env: &'a TypeEnvironment,
    scopes: Vec<Vec<(String, Ty)>>,
    inferred: BTreeMap<String, Ty>,
    bindings: Vec<Option<Ty>>,
    problems: Vec<TypeProblem>,
    /// Types that must be fully determined once checking is done.
    pending: Vec<(usize, String, Ty)>,
}

impl<'a> Checker<'a> {
    fn new(env: &'a TypeEnvironment) -> Self {
        Checker {
            env,
            scopes: Vec::new(),
            inferred: BTreeMap::new(),
            bindings: Vec::new(),
            problems: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn fresh(&mut self) -> Ty {
        self.bindings.push(None);
        Ty::Var(self.bindings.len() - 1)
    }

    fn problem(&mut self, offset: usize, message: impl Into<String>) {
        self.problems.push(TypeProblem {
            offset,
            message: message.into(),
        });
    }

    // -- Substitution ------------------------------------------

    /// Follow variable bindings at the top level only.
    fn shallow(&self, t: &Ty) -> Ty {
        let mut t = t.clone();
        while let Ty::Var(i) = t {
            match &self.bindings[i] {
                Some(bound) => t = bound.clone(),
                None => break,
            }
        }
        t
    }

    fn resolve(&self, t: &Ty) -> Ty {
        match self.shallow(t) {
            Ty::Power(inner) => pow(self.resolve(&inner)),
            Ty::Product(l, r) => prod(self.resolve(&l), self.resolve(&r)),
            other => other,
        }
    }

    fn ground(&self, t: &Ty) -> Option<Type> {
        match self.shallow(t) {
            Ty::Integer => Some(Type::Integer),
            Ty::Boolean => Some(Type::Boolean),
            Ty::Given(n) => Some(Type::Given(n)),
            Ty::Power(inner) => Some(Type::power(self.ground(&inner)?)),
            Ty::Product(l, r) => Some(Type::product(self.ground(&l)?, self.ground(&r)?)),
            Ty::Var(_) => None,
        }
    }

    fn show(&self, t: &Ty) -> String {
        fn go(t: &Ty, out: &mut String) {
            match t {
                Ty::Integer => out.push('\u{2124}'),
                Ty::Boolean => out.push_str("BOOL"),
                Ty::Given(n) => out.push_str(n),
                Ty::Var(_) => out.push('?'),
                Ty::Power(inner) => {
                    out.push_str("\u{2119}(");
                    go(inner, out);
                    out.push(')');
                }
                Ty::Product(l, r) => {
                    go(l, out);
                    out.push('\u{00d7}');
                    if matches!(r.as_ref(), Ty::Product(..)) {
                        out.push('(');
                        go(r, out);
                        out.push(')');
                    } else {
                        go(r, out);
                    }
                }
            }
        }
        let mut out = String::new();
        go(&self.resolve(t), &mut out);
        out
    }

    fn occurs(&self, var: usize, t: &Ty) -> bool {
        match self.shallow(t) {
            Ty::Var(i) => i == var,
            Ty::Power(inner) => self.occurs(var, &inner),
            Ty::Product(l, r) => self.occurs(var, &l) || self.occurs(var, &r),
            _ => false,
        }
    }

    fn unify(&mut self, a: &Ty, b: &Ty) -> bool {
        match (self.shallow(a), self.shallow(b)) {
            (Ty::Var(i), Ty::Var(j)) if i == j => true,
            (Ty::Var(i), t) | (t, Ty::Var(i)) => {
                if self.occurs(i, &t) {
                    return false;
                }
                self.bindings[i] = Some(t);
                true
            }
            (Ty::Power(x), Ty::Power(y)) => self.unify(&x, &y),
            (Ty::Product(l1, r1), Ty::Product(l2, r2)) => {
                self.unify(&l1, &l2) && self.unify(&r1, &r2)
            }
            (x, y) => x == y,
        }
    }

    /// Require `actual` to unify with `expected`, reporting a mismatch at
    /// `offset` otherwise.
    fn expect(&mut self, offset: usize, actual: &Ty, expected: &Ty) {
        if !self.unify(actual, expected) {
            let msg = format!(
                "type mismatch: expected {}, found {}",
                self.show(expected),
                self.show(actual)
            );
            self.problem(offset, msg);
        }
    }

    fn expect_expr(&mut self, e: &Expr, expected: &Ty) {
        let actual = self.expr(e);
        self.expect(e.span.start, &actual, expected);
    }

    // -- Scopes ------------------------------------------------

    fn lookup(&mut self, name: &str) -> Ty {
        for scope in self.scopes.iter().rev() {
            if let Some((_, t)) = scope.iter().find(|(n, _)| n == name) {
                return t.clone();
            }
        }
        if let Some(t) = self.env.get(name) {
            return Ty::from(t);
        }
        if let Some(t) = self.inferred.get(name) {
            return t.clone();
        }
        let t = self.fresh();
        self.inferred.insert(name.to_owned(), t.clone());
        t
    }

    fn push_scope(&mut self, bound: &[BoundIdent]) {
        let mut seen = HashSet::new();
        let mut scope = Vec::new();
        for b in bound {
            if !seen.insert(b.name.as_str()) {
                self.problem(
                    b.span.start,
                    format!("identifier '{}' is bound twice", b.name),
                );
                continue;
            }
            let t = self.fresh();
            scope.push((b.name.clone(), t));
        }
        self.scopes.push(scope);
    }

    fn pop_scope(&mut self, bound: &[BoundIdent]) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        for (name, t) in scope {
            let offset = bound
                .iter()
                .find(|b| b.name == name)
                .map(|b| b.span.start)
                .unwrap_or(0);
            self.pending
                .push((offset, format!("bound identifier '{}'", name), t));
        }
    }

    fn finish(mut self) -> TypeCheckResult {
        let pending = std::mem::take(&mut self.pending);
        for (offset, what, t) in pending {
            if self.ground(&t).is_none() {
                self.problem(offset, format!("type of {} could not be inferred", what));
            }
        }
        let inferred = self
            .inferred
            .iter()
            .map(|(n, t)| (n.clone(), self.ground(t)))
            .collect();
        TypeCheckResult {
            problems: self.problems,
            inferred,
        }
    }

    // -- Expressions -------------------------------------------

    fn expr(&mut self, e: &Expr) -> Ty {
        match &e.kind {
            ExprKind::Identifier(name) => self.lookup(name),
            ExprKind::Integer(_) => Ty::Integer,
            ExprKind::Atomic(a) => match a {
                AtomicExpr::True | AtomicExpr::False => Ty::Boolean,
                AtomicExpr::BoolSet => pow(Ty::Boolean),
                AtomicExpr::Integers | AtomicExpr::Naturals | AtomicExpr::Naturals1 => {
                    pow(Ty::Integer)
                }
                AtomicExpr::EmptySet => {
                    let t = pow(self.fresh());
                    self.pending
                        .push((e.span.start, "\u{2205}".to_owned(), t.clone()));
                    t
                }
            },
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right),
            ExprKind::Unary { op, operand } => self.unary(*op, operand),
            ExprKind::Apply { function, argument } => {
                let a = self.fresh();
                let b = self.fresh();
                self.expect_expr(function, &pow(prod(a.clone(), b.clone())));
                self.expect_expr(argument, &a);
                b
            }
            ExprKind::Image { relation, set } => {
                let a = self.fresh();
                let b = self.fresh();
                self.expect_expr(relation, &pow(prod(a.clone(), b.clone())));
                self.expect_expr(set, &pow(a));
                pow(b)
            }
            ExprKind::SetExtension(members) => {
                let a = self.fresh();
                for m in members {
                    self.expect_expr(m, &a);
                }
                pow(a)
            }
            ExprKind::Comprehension {
                bound,
                predicate,
                expression,
            } => {
                self.push_scope(bound);
                self.pred(predicate);
                let t = self.expr(expression);
                self.pop_scope(bound);
                pow(t)
            }
            ExprKind::Bool(p) => {
                self.pred(p);
                Ty::Boolean
            }
        }
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Ty {
        match op {
            BinaryOp::Maplet => {
                let l = self.expr(left);
                let r = self.expr(right);
                prod(l, r)
            }
            BinaryOp::Relation | BinaryOp::PartialFunction | BinaryOp::TotalFunction => {
                let a = self.fresh();
                let b = self.fresh();
                self.expect_expr(left, &pow(a.clone()));
                self.expect_expr(right, &pow(b.clone()));
                pow(pow(prod(a, b)))
            }
            BinaryOp::Union | BinaryOp::Intersection | BinaryOp::SetMinus => {
                let a = pow(self.fresh());
                self.expect_expr(left, &a);
                self.expect_expr(right, &a);
                a
            }
            BinaryOp::Cartesian => {
                let a = self.fresh();
                let b = self.fresh();
                self.expect_expr(left, &pow(a.clone()));
                self.expect_expr(right, &pow(b.clone()));
                pow(prod(a, b))
            }
            BinaryOp::UpTo => {
                self.expect_expr(left, &Ty::Integer);
                self.expect_expr(right, &Ty::Integer);
                pow(Ty::Integer)
            }
            BinaryOp::Plus
            | BinaryOp::Minus
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Expn => {
                self.expect_expr(left, &Ty::Integer);
                self.expect_expr(right, &Ty::Integer);
                Ty::Integer
            }
        }
    }

    fn unary(&mut self, op: UnaryOp, operand: &Expr) -> Ty {
        match op {
            UnaryOp::Negate => {
                self.expect_expr(operand, &Ty::Integer);
                Ty::Integer
            }
            UnaryOp::PowerSet => {
                let a = pow(self.fresh());
                self.expect_expr(operand, &a);
                pow(a)
            }
            UnaryOp::Card => {
                let a = pow(self.fresh());
                self.expect_expr(operand, &a);
                Ty::Integer
            }
            UnaryOp::Min | UnaryOp::Max => {
                self.expect_expr(operand, &pow(Ty::Integer));
                Ty::Integer
            }
            UnaryOp::Dom | UnaryOp::Ran | UnaryOp::Converse => {
                let a = self.fresh();
                let b = self.fresh();
                self.expect_expr(operand, &pow(prod(a.clone(), b.clone())));
                match op {
                    UnaryOp::Dom => pow(a),
                    UnaryOp::Ran => pow(b),
                    _ => pow(prod(b, a)),
                }
            }
        }
    }

    // -- Predicates --------------------------------------------

    fn pred(&mut self, p: &Pred) {
        match &p.kind {
            PredKind::Literal(_) => {}
            PredKind::Binary { left, right, .. } => {
                self.pred(left);
                self.pred(right);
            }
            PredKind::Not(inner) => self.pred(inner),
            PredKind::Quantified { bound, body, .. } => {
                self.push_scope(bound);
                self.pred(body);
                self.pop_scope(bound);
            }
            PredKind::Relation { op, left, right } => self.relation(*op, left, right),
            PredKind::Finite(e) => {
                let a = pow(self.fresh());
                self.expect_expr(e, &a);
            }
        }
    }

    fn relation(&mut self, op: RelOp, left: &Expr, right: &Expr) {
        match op {
            RelOp::Eq | RelOp::Neq => {
                let a = self.fresh();
                self.expect_expr(left, &a);
                self.expect_expr(right, &a);
            }
            RelOp::Lt | RelOp::Le | RelOp::Gt | RelOp::Ge => {
                self.expect_expr(left, &Ty::Integer);
                self.expect_expr(right, &Ty::Integer);
            }
            RelOp::In | RelOp::NotIn => {
                let a = self.fresh();
                self.expect_expr(left, &a);
                self.expect_expr(right, &pow(a));
            }
            RelOp::Subset | RelOp::NotSubset | RelOp::StrictSubset | RelOp::NotStrictSubset => {
                let a = pow(self.fresh());
                self.expect_expr(left, &a);
                self.expect_expr(right, &a);
            }
        }
    }
}
