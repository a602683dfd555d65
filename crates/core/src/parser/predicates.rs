use super::Parser;
use crate::ast::{LogicOp, Pred, PredKind, Quantifier, RelOp};
use crate::error::ParseError;
use crate::factory::Keyword;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(super) fn parse_pred(&mut self) -> Result<Pred, ParseError> {
        self.parse_equiv()
    }

    fn parse_equiv(&mut self) -> Result<Pred, ParseError> {
        let left = self.parse_implies()?;
        if self.peek() != &Token::Equiv {
            return Ok(left);
        }
        self.advance();
        let right = self.parse_implies()?;
        if self.peek() == &Token::Equiv {
            return Err(self.err("\u{21d4} is not associative; use parentheses"));
        }
        let span = left.span.to(right.span);
        Ok(Pred::new(
            PredKind::Binary {
                op: LogicOp::Equiv,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_implies(&mut self) -> Result<Pred, ParseError> {
        let left = self.parse_junction()?;
        if self.peek() != &Token::Implies {
            return Ok(left);
        }
        self.advance();
        let right = self.parse_junction()?;
        if self.peek() == &Token::Implies {
            return Err(self.err("\u{21d2} is not associative; use parentheses"));
        }
        let span = left.span.to(right.span);
        Ok(Pred::new(
            PredKind::Binary {
                op: LogicOp::Implies,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    /// ∧ and ∨ chains. The two may not be mixed at the same level.
    fn parse_junction(&mut self) -> Result<Pred, ParseError> {
        let mut left = self.parse_unary_pred()?;
        let mut seen: Option<LogicOp> = None;
        loop {
            let op = match self.peek() {
                Token::And => LogicOp::And,
                Token::Or => LogicOp::Or,
                _ => return Ok(left),
            };
            if seen.is_some_and(|s| s != op) {
                return Err(self.err("mixing \u{2227} and \u{2228} requires parentheses"));
            }
            seen = Some(op);
            self.advance();
            let right = self.parse_unary_pred()?;
            let span = left.span.to(right.span);
            left = Pred::new(
                PredKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
    }

    fn parse_unary_pred(&mut self) -> Result<Pred, ParseError> {
        if self.peek() == &Token::Not {
            let start = self.cur_start();
            self.advance();
            let operand = self.parse_unary_pred()?;
            return Ok(Pred::new(
                PredKind::Not(Box::new(operand)),
                self.span_from(start),
            ));
        }
        self.parse_atom_pred()
    }

    fn parse_atom_pred(&mut self) -> Result<Pred, ParseError> {
        let start = self.cur_start();
        match self.peek().clone() {
            Token::Forall | Token::Exists => {
                let quantifier = if self.peek() == &Token::Forall {
                    Quantifier::Forall
                } else {
                    Quantifier::Exists
                };
                self.advance();
                let bound = self.parse_bound_list()?;
                self.expect(Token::Dot, "\u{00b7}")?;
                let body = self.parse_pred()?;
                Ok(Pred::new(
                    PredKind::Quantified {
                        quantifier,
                        bound,
                        body: Box::new(body),
                    },
                    self.span_from(start),
                ))
            }
            Token::Top | Token::Bottom => {
                let value = self.peek() == &Token::Top;
                self.advance();
                Ok(Pred::new(PredKind::Literal(value), self.span_from(start)))
            }
            Token::Keyword(Keyword::Finite) => {
                self.advance();
                self.expect(Token::LParen, "(")?;
                let e = self.parse_expr()?;
                self.expect(Token::RParen, ")")?;
                Ok(Pred::new(
                    PredKind::Finite(Box::new(e)),
                    self.span_from(start),
                ))
            }
            Token::LParen if self.paren_group_is_predicate() => self.parse_paren_pred(),
            _ => self.parse_relation(),
        }
    }

    /// A parenthesised group at predicate level is a predicate unless the
    /// token after its closing `)` continues an expression.
    fn paren_group_is_predicate(&self) -> bool {
        let mut depth = 0usize;
        let mut i = 0;
        loop {
            match self.peek_at(i) {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Token::Eof => return true,
                _ => {}
            }
            i += 1;
        }
        matches!(
            self.peek_at(i + 1),
            Token::And
                | Token::Or
                | Token::Implies
                | Token::Equiv
                | Token::RParen
                | Token::Bar
                | Token::Eof
        )
    }

    fn parse_paren_pred(&mut self) -> Result<Pred, ParseError> {
        let start = self.cur_start();
        self.expect(Token::LParen, "(")?;
        let mut inner = self.parse_pred()?;
        self.expect(Token::RParen, ")")?;
        inner.span = self.span_from(start);
        Ok(inner)
    }

    fn parse_relation(&mut self) -> Result<Pred, ParseError> {
        let left = self.parse_expr()?;
        let op = self.parse_rel_op()?;
        let right = self.parse_expr()?;
        let span = left.span.to(right.span);
        Ok(Pred::new(
            PredKind::Relation {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_rel_op(&mut self) -> Result<RelOp, ParseError> {
        let op = match self.peek() {
            Token::Eq => RelOp::Eq,
            Token::Neq => RelOp::Neq,
            Token::Lt => RelOp::Lt,
            Token::Le => RelOp::Le,
            Token::Gt => RelOp::Gt,
            Token::Ge => RelOp::Ge,
            Token::In => RelOp::In,
            Token::NotIn => RelOp::NotIn,
            Token::Subset => RelOp::Subset,
            Token::NotSubset => RelOp::NotSubset,
            Token::StrictSubset => RelOp::StrictSubset,
            Token::NotStrictSubset => RelOp::NotStrictSubset,
            _ => {
                return Err(self.err(format!(
                    "expected relational operator, got {}",
                    self.peek()
                )))
            }
        };
        self.advance();
        Ok(op)
    }
}
