/// Recursive-descent parser for the expression and predicate grammars.
/// Produces the AST in `crate::ast`; no type information is attached here,
/// that is the type checker's job.
use crate::ast::{BoundIdent, Expr, Pred, Span};
use crate::error::ParseError;
use crate::lexer::{Spanned, Token};

mod expressions;
mod predicates;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let i = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[i].token
    }

    fn cur_start(&self) -> usize {
        self.cur().start
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].end
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end())
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, expected: Token, shown: &str) -> Result<(), ParseError> {
        if self.peek() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '{}', got {}", shown, self.peek())))
        }
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::single(self.cur_start(), msg)
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.peek() == &Token::Eof {
            Ok(())
        } else {
            Err(self.err(format!(
                "unexpected {} after end of formula",
                self.peek()
            )))
        }
    }

    /// `x, y, z` as introduced by a quantifier or comprehension.
    fn parse_bound_list(&mut self) -> Result<Vec<BoundIdent>, ParseError> {
        let mut bound = Vec::new();
        loop {
            let start = self.cur_start();
            match self.peek().clone() {
                Token::Word(name) if name.ends_with('\'') => {
                    return Err(self.err(format!(
                        "bound identifier '{}' cannot be primed",
                        name
                    )));
                }
                Token::Word(name) => {
                    self.advance();
                    bound.push(BoundIdent {
                        name,
                        span: self.span_from(start),
                    });
                }
                other => {
                    return Err(self.err(format!("expected identifier, got {}", other)));
                }
            }
            if self.peek() == &Token::Comma {
                self.advance();
            } else {
                return Ok(bound);
            }
        }
    }
}

pub fn parse_expression(tokens: &[Spanned]) -> Result<Expr, ParseError> {
    let mut p = Parser::new(tokens);
    let e = p.parse_expr()?;
    p.expect_eof()?;
    Ok(e)
}

pub fn parse_predicate(tokens: &[Spanned]) -> Result<Pred, ParseError> {
    let mut p = Parser::new(tokens);
    let pred = p.parse_pred()?;
    p.expect_eof()?;
    Ok(pred)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
