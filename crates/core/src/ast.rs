//! Formula AST.
//!
//! Produced by the parser, read by the type checker and the term
//! serializer. Every node carries a [`Span`] of character offsets into the
//! normalized text it was parsed from.

// ──────────────────────────────────────────────
// Spans
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

// ──────────────────────────────────────────────
// Formulas
// ──────────────────────────────────────────────

/// Either grammar entry point's result.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Expression(Expr),
    Predicate(Pred),
}

/// An identifier introduced by a quantifier or a comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundIdent {
    pub name: String,
    pub span: Span,
}

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Free or bound identifier, possibly primed (`x'`)
    Identifier(String),
    Integer(i64),
    Atomic(AtomicExpr),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// f(x)
    Apply {
        function: Box<Expr>,
        argument: Box<Expr>,
    },
    /// r[S]
    Image {
        relation: Box<Expr>,
        set: Box<Expr>,
    },
    /// {a, b, c}
    SetExtension(Vec<Expr>),
    /// {x, y · P ∣ E}
    Comprehension {
        bound: Vec<BoundIdent>,
        predicate: Box<Pred>,
        expression: Box<Expr>,
    },
    /// bool(P)
    Bool(Box<Pred>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicExpr {
    True,
    False,
    BoolSet,
    Integers,
    Naturals,
    Naturals1,
    EmptySet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// ↦
    Maplet,
    /// ↔
    Relation,
    /// ⇸
    PartialFunction,
    /// →
    TotalFunction,
    /// ∪
    Union,
    /// ∩
    Intersection,
    /// ∖
    SetMinus,
    /// ×
    Cartesian,
    /// ‥
    UpTo,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Expn,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Maplet => "\u{21a6}",
            BinaryOp::Relation => "\u{2194}",
            BinaryOp::PartialFunction => "\u{21f8}",
            BinaryOp::TotalFunction => "\u{2192}",
            BinaryOp::Union => "\u{222a}",
            BinaryOp::Intersection => "\u{2229}",
            BinaryOp::SetMinus => "\u{2216}",
            BinaryOp::Cartesian => "\u{00d7}",
            BinaryOp::UpTo => "\u{2025}",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "\u{2212}",
            BinaryOp::Mul => "\u{2217}",
            BinaryOp::Div => "\u{00f7}",
            BinaryOp::Mod => "mod",
            BinaryOp::Expn => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// unary −
    Negate,
    /// ℙ(E)
    PowerSet,
    Card,
    Dom,
    Ran,
    Min,
    Max,
    /// postfix ∼
    Converse,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "\u{2212}",
            UnaryOp::PowerSet => "\u{2119}",
            UnaryOp::Card => "card",
            UnaryOp::Dom => "dom",
            UnaryOp::Ran => "ran",
            UnaryOp::Min => "min",
            UnaryOp::Max => "max",
            UnaryOp::Converse => "\u{223c}",
        }
    }
}

// ──────────────────────────────────────────────
// Predicates
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Pred {
    pub kind: PredKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredKind {
    /// ⊤ / ⊥
    Literal(bool),
    Binary {
        op: LogicOp,
        left: Box<Pred>,
        right: Box<Pred>,
    },
    Not(Box<Pred>),
    Quantified {
        quantifier: Quantifier,
        bound: Vec<BoundIdent>,
        body: Box<Pred>,
    },
    Relation {
        op: RelOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Finite(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Implies,
    Equiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Forall,
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Subset,
    NotSubset,
    StrictSubset,
    NotStrictSubset,
}

impl RelOp {
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Eq => "=",
            RelOp::Neq => "\u{2260}",
            RelOp::Lt => "<",
            RelOp::Le => "\u{2264}",
            RelOp::Gt => ">",
            RelOp::Ge => "\u{2265}",
            RelOp::In => "\u{2208}",
            RelOp::NotIn => "\u{2209}",
            RelOp::Subset => "\u{2286}",
            RelOp::NotSubset => "\u{2288}",
            RelOp::StrictSubset => "\u{2282}",
            RelOp::NotStrictSubset => "\u{2284}",
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl Pred {
    pub fn new(kind: PredKind, span: Span) -> Self {
        Pred { kind, span }
    }
}
