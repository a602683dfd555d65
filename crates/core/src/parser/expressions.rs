use super::Parser;
use crate::ast::{AtomicExpr, BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::ParseError;
use crate::factory::Keyword;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_maplet()
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let span = left.span.to(right.span);
        Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    fn parse_maplet(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relation_set()?;
        while self.peek() == &Token::Maplet {
            self.advance();
            let right = self.parse_relation_set()?;
            left = Self::binary(BinaryOp::Maplet, left, right);
        }
        Ok(left)
    }

    /// ↔ ⇸ → associate to the right.
    fn parse_relation_set(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_set_op()?;
        let op = match self.peek() {
            Token::Rel => BinaryOp::Relation,
            Token::PFun => BinaryOp::PartialFunction,
            Token::TFun => BinaryOp::TotalFunction,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_relation_set()?;
        Ok(Self::binary(op, left, right))
    }

    fn parse_set_op(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_interval()?;
        loop {
            let op = match self.peek() {
                Token::Union => BinaryOp::Union,
                Token::Inter => BinaryOp::Intersection,
                Token::SetMinus => BinaryOp::SetMinus,
                Token::Times => BinaryOp::Cartesian,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_interval()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_interval(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;
        if self.peek() != &Token::UpTo {
            return Ok(left);
        }
        self.advance();
        let right = self.parse_additive()?;
        if self.peek() == &Token::UpTo {
            return Err(self.err("\u{2025} is not associative; use parentheses"));
        }
        Ok(Self::binary(BinaryOp::UpTo, left, right))
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Plus,
                Token::Minus => BinaryOp::Minus,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_power()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Div => BinaryOp::Div,
                Token::Keyword(Keyword::Mod) => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_power()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expr()?;
        while self.peek() == &Token::Caret {
            self.advance();
            let right = self.parse_unary_expr()?;
            left = Self::binary(BinaryOp::Expn, left, right);
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == &Token::Minus {
            let start = self.cur_start();
            self.advance();
            let operand = self.parse_unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(operand),
                },
                self.span_from(start),
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let start = self.cur_start();
        let mut e = self.parse_primary()?;
        loop {
            match self.peek() {
                Token::Converse => {
                    self.advance();
                    e = Expr::new(
                        ExprKind::Unary {
                            op: UnaryOp::Converse,
                            operand: Box::new(e),
                        },
                        self.span_from(start),
                    );
                }
                Token::LParen => {
                    self.advance();
                    let argument = self.parse_expr()?;
                    self.expect(Token::RParen, ")")?;
                    e = Expr::new(
                        ExprKind::Apply {
                            function: Box::new(e),
                            argument: Box::new(argument),
                        },
                        self.span_from(start),
                    );
                }
                Token::LBracket => {
                    self.advance();
                    let set = self.parse_expr()?;
                    self.expect(Token::RBracket, "]")?;
                    e = Expr::new(
                        ExprKind::Image {
                            relation: Box::new(e),
                            set: Box::new(set),
                        },
                        self.span_from(start),
                    );
                }
                _ => return Ok(e),
            }
        }
    }

    /// `op(E)` for the prefix operators written with mandatory parentheses.
    fn parse_prefix_call(&mut self, op: UnaryOp, start: usize) -> Result<Expr, ParseError> {
        self.advance();
        self.expect(Token::LParen, "(")?;
        let operand = self.parse_expr()?;
        self.expect(Token::RParen, ")")?;
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            self.span_from(start),
        ))
    }

    fn atomic(&mut self, a: AtomicExpr, start: usize) -> Result<Expr, ParseError> {
        self.advance();
        Ok(Expr::new(ExprKind::Atomic(a), self.span_from(start)))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.cur_start();
        match self.peek().clone() {
            Token::Word(name) => {
                self.advance();
                Ok(Expr::new(ExprKind::Identifier(name), self.span_from(start)))
            }
            Token::Int(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Integer(n), self.span_from(start)))
            }
            Token::Keyword(Keyword::True) => self.atomic(AtomicExpr::True, start),
            Token::Keyword(Keyword::False) => self.atomic(AtomicExpr::False, start),
            Token::Keyword(Keyword::BoolSet) => self.atomic(AtomicExpr::BoolSet, start),
            Token::Integers => self.atomic(AtomicExpr::Integers, start),
            Token::Naturals => self.atomic(AtomicExpr::Naturals, start),
            Token::Naturals1 => self.atomic(AtomicExpr::Naturals1, start),
            Token::EmptySet => self.atomic(AtomicExpr::EmptySet, start),
            Token::Pow => self.parse_prefix_call(UnaryOp::PowerSet, start),
            Token::Keyword(Keyword::Card) => self.parse_prefix_call(UnaryOp::Card, start),
            Token::Keyword(Keyword::Dom) => self.parse_prefix_call(UnaryOp::Dom, start),
            Token::Keyword(Keyword::Ran) => self.parse_prefix_call(UnaryOp::Ran, start),
            Token::Keyword(Keyword::Min) => self.parse_prefix_call(UnaryOp::Min, start),
            Token::Keyword(Keyword::Max) => self.parse_prefix_call(UnaryOp::Max, start),
            Token::Keyword(Keyword::Bool) => {
                self.advance();
                self.expect(Token::LParen, "(")?;
                let p = self.parse_pred()?;
                self.expect(Token::RParen, ")")?;
                Ok(Expr::new(
                    ExprKind::Bool(Box::new(p)),
                    self.span_from(start),
                ))
            }
            Token::LParen => {
                self.advance();
                let mut inner = self.parse_expr()?;
                self.expect(Token::RParen, ")")?;
                inner.span = self.span_from(start);
                Ok(inner)
            }
            Token::LBrace => self.parse_braces(start),
            other => Err(self.err(format!("expected expression, got {}", other))),
        }
    }

    /// True when the tokens after `{` read `x, y, ... ·`.
    fn at_comprehension(&self) -> bool {
        let mut i = 0;
        loop {
            if !matches!(self.peek_at(i), Token::Word(_)) {
                return false;
            }
            match self.peek_at(i + 1) {
                Token::Comma => i += 2,
                Token::Dot => return true,
                _ => return false,
            }
        }
    }

    fn parse_braces(&mut self, start: usize) -> Result<Expr, ParseError> {
        self.advance();
        if self.peek() == &Token::RBrace {
            return Err(self.err("empty set extension; write \u{2205}"));
        }

        if self.at_comprehension() {
            let bound = self.parse_bound_list()?;
            self.expect(Token::Dot, "\u{00b7}")?;
            let predicate = self.parse_pred()?;
            self.expect(Token::Bar, "\u{2223}")?;
            let expression = self.parse_expr()?;
            self.expect(Token::RBrace, "}")?;
            return Ok(Expr::new(
                ExprKind::Comprehension {
                    bound,
                    predicate: Box::new(predicate),
                    expression: Box::new(expression),
                },
                self.span_from(start),
            ));
        }

        let mut members = vec![self.parse_expr()?];
        while self.peek() == &Token::Comma {
            self.advance();
            members.push(self.parse_expr()?);
        }
        self.expect(Token::RBrace, "}")?;
        Ok(Expr::new(
            ExprKind::SetExtension(members),
            self.span_from(start),
        ))
    }
}
