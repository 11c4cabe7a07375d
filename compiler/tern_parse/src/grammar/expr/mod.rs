//! Expression parsing: a precedence chain from assignment down to
//! postfix forms over a primary.
//!
//! Tiers, loosest first:
//! 1. assignment `= += -= *= /=`, right-associative
//! 2. logical `&& ||`
//! 3. relational `== != < > <= >= in`, plus `is Type [alias]`
//! 4. additive `+ -`
//! 5. multiplicative `* / ..`
//! 6. prefix `- + ! & * ++ --`
//! 7. postfix, see [`postfix`]

mod operators;
mod postfix;
mod primary;

use tern_ir::ast::{BinaryOp, BooleanOp, Expr, ExprKind, Ident};
use tern_ir::TokenKind;
use tern_stack::ensure_sufficient_stack;

use crate::{PResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    fn parse_assignment(&mut self) -> PResult<Expr> {
        let target = self.parse_logical()?;
        let Some(op) = self.match_assign_op() else {
            return Ok(target);
        };
        self.cursor.advance();
        let value = self.parse_expr()?;
        let pos = target.pos.merge(value.pos);
        Ok(Expr::new(
            ExprKind::Assignment {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            pos,
        ))
    }

    fn parse_logical(&mut self) -> PResult<Expr> {
        let mut left = self.parse_relational()?;
        while let Some(op) = self.match_logical_op() {
            self.cursor.advance();
            let right = self.parse_relational()?;
            left = boolean(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> PResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            if self.cursor.eat_same_line(TokenKind::KeyIs) {
                let ty = self.parse_type()?;
                let alias = if self.cursor.check_same_line(TokenKind::Identifier) {
                    let token = self.cursor.advance();
                    Some(Ident::new(token.value.as_str(), token.pos))
                } else {
                    None
                };
                let pos = self.span_from(left.pos);
                left = Expr::new(
                    ExprKind::Is {
                        expr: Box::new(left),
                        ty,
                        alias,
                    },
                    pos,
                );
            } else if let Some(op) = self.match_relational_op() {
                self.cursor.advance();
                let right = self.parse_additive()?;
                left = boolean(op, left, right);
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.parse_prefix()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.cursor.advance();
            let right = self.parse_prefix()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    pub(crate) fn parse_prefix(&mut self) -> PResult<Expr> {
        let Some(op) = self.match_prefix_op() else {
            return self.parse_postfix();
        };
        let start = self.cursor.advance().pos;
        let operand = ensure_sufficient_stack(|| self.parse_prefix())?;
        let pos = start.merge(operand.pos);
        Ok(Expr::new(
            ExprKind::Prefix {
                op,
                expr: Box::new(operand),
            },
            pos,
        ))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let pos = left.pos.merge(right.pos);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        pos,
    )
}

fn boolean(op: BooleanOp, left: Expr, right: Expr) -> Expr {
    let pos = left.pos.merge(right.pos);
    Expr::new(
        ExprKind::Boolean {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        pos,
    )
}
