//! Postfix forms over a primary expression.
//!
//! `.member` may continue on a new line; every other form must stay on the
//! line of the expression it applies to.

use tern_ir::ast::{Call, CatchClause, Expr, ExprKind, PostfixOp, TypeNode};
use tern_ir::TokenKind;

use crate::{PResult, Parser};

impl Parser<'_> {
    pub(super) fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let token = self.cursor.current();
            let same_line = !token.on_new_line;
            expr = match token.kind {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let member = self.expect_ident()?;
                    let pos = self.span_from(expr.pos);
                    Expr::new(
                        ExprKind::Member {
                            base: Box::new(expr),
                            member,
                        },
                        pos,
                    )
                }
                TokenKind::OpenBracket if same_line => {
                    self.cursor.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::CloseBracket)?;
                    let pos = self.span_from(expr.pos);
                    Expr::new(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        pos,
                    )
                }
                TokenKind::OpenPar if same_line => self.parse_call(expr, Vec::new())?,
                TokenKind::BooleanLess if same_line => {
                    match self.speculate(|p| p.parse_call_generics()) {
                        Some(generics) => self.parse_call(expr, generics)?,
                        None => return Ok(expr),
                    }
                }
                TokenKind::Increment | TokenKind::Decrement if same_line => {
                    self.cursor.advance();
                    let op = if token.kind == TokenKind::Increment {
                        PostfixOp::Increment
                    } else {
                        PostfixOp::Decrement
                    };
                    let pos = self.span_from(expr.pos);
                    Expr::new(
                        ExprKind::Postfix {
                            op,
                            expr: Box::new(expr),
                        },
                        pos,
                    )
                }
                TokenKind::KeyAs if same_line => {
                    self.cursor.advance();
                    let ty = self.parse_type()?;
                    let pos = self.span_from(expr.pos);
                    Expr::new(
                        ExprKind::Cast {
                            expr: Box::new(expr),
                            ty,
                        },
                        pos,
                    )
                }
                _ => return Ok(expr),
            };
        }
    }

    /// `<T, ...>` directly followed by `(`. `None` means the `<` is a
    /// comparison after all.
    fn parse_call_generics(&mut self) -> PResult<Option<Vec<TypeNode>>> {
        self.cursor.advance();
        let mut generics = vec![self.parse_type()?];
        while self.cursor.eat(TokenKind::Comma) {
            generics.push(self.parse_type()?);
        }
        if !self.cursor.eat(TokenKind::BooleanGreater) {
            return Ok(None);
        }
        Ok(self
            .cursor
            .check_same_line(TokenKind::OpenPar)
            .then_some(generics))
    }

    /// `(args)` after `callee`, then an optional `catch [name] { ... }`.
    fn parse_call(&mut self, callee: Expr, generics: Vec<TypeNode>) -> PResult<Expr> {
        self.expect(TokenKind::OpenPar)?;
        let args = self.comma_list(TokenKind::ClosePar, |p| p.parse_expr())?;
        let catch = if self.cursor.check_same_line(TokenKind::KeyCatch) {
            let start = self.cursor.advance().pos;
            let binding = if self.cursor.check(TokenKind::Identifier) {
                Some(self.expect_ident()?)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause {
                binding,
                body,
                pos: self.span_from(start),
            })
        } else {
            None
        };
        let pos = self.span_from(callee.pos);
        Ok(Expr::new(
            ExprKind::Call(Box::new(Call {
                callee,
                generics,
                args,
                catch,
            })),
            pos,
        ))
    }
}
