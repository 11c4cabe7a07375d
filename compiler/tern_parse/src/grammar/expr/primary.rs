//! Primary expressions: literals, names, groups and keyword-led forms.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{
    Conditional, ConditionalKind, Expr, ExprKind, FieldInit, Literal, LiteralKind, SwitchCase,
};
use tern_ir::TokenKind;

use crate::recovery::EXPR_RECOVERY;
use crate::{describe, PResult, Parser};

impl Parser<'_> {
    pub(super) fn parse_primary(&mut self) -> PResult<Expr> {
        let token = self.cursor.current();
        let literal = |kind| ExprKind::Literal(Literal::new(kind, token.value.as_str()));
        let kind = match token.kind {
            TokenKind::ConstantDigit => literal(LiteralKind::Int),
            TokenKind::ConstantFloatDigit => literal(LiteralKind::Float),
            TokenKind::ConstantString => literal(LiteralKind::Str),
            TokenKind::ConstantChar => literal(LiteralKind::Char),
            TokenKind::ConstantBoolean => literal(LiteralKind::Bool),
            TokenKind::Identifier => ExprKind::Identifier(token.value.clone()),
            TokenKind::OpenPar => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::ClosePar)?;
                return Ok(inner);
            }
            TokenKind::OpenBrace => {
                let block = self.parse_block()?;
                let pos = block.pos;
                return Ok(Expr::new(ExprKind::Block(block), pos));
            }
            TokenKind::KeyTry => {
                self.cursor.advance();
                let inner = self.parse_prefix()?;
                let pos = self.span_from(token.pos);
                return Ok(Expr::new(ExprKind::Try(Box::new(inner)), pos));
            }
            TokenKind::KeyNew => return self.parse_new(),
            TokenKind::KeyIf => {
                let cond = self.parse_conditional(ConditionalKind::If)?;
                let pos = cond.pos;
                return Ok(Expr::new(ExprKind::Conditional(Box::new(cond)), pos));
            }
            TokenKind::KeyWhile => {
                let cond = self.parse_conditional(ConditionalKind::While)?;
                let pos = cond.pos;
                return Ok(Expr::new(ExprKind::Conditional(Box::new(cond)), pos));
            }
            TokenKind::KeySwitch => return self.parse_switch(),
            TokenKind::Eof => return Err(self.unexpected_eof()),
            kind => {
                self.bag.error(
                    ErrorCode::E1008,
                    token.pos,
                    format!("expected expression, found '{}'", describe(token)),
                );
                if !EXPR_RECOVERY.contains(kind) {
                    self.cursor.advance();
                }
                return Ok(Expr::bad(token.pos));
            }
        };
        self.cursor.advance();
        Ok(Expr::new(kind, token.pos))
    }

    /// One link of an `if`/`elif`/`else` chain, or a `while` loop. The
    /// current token is the keyword.
    fn parse_conditional(&mut self, kind: ConditionalKind) -> PResult<Conditional> {
        let start = self.cursor.advance().pos;
        let condition = if kind == ConditionalKind::Else {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let body = self.parse_block()?;
        let else_node = match (kind, self.cursor.current_kind()) {
            (ConditionalKind::If | ConditionalKind::Elif, TokenKind::KeyElif) => {
                Some(self.parse_conditional(ConditionalKind::Elif)?)
            }
            (ConditionalKind::If | ConditionalKind::Elif, TokenKind::KeyElse) => {
                if self.cursor.peek_kind() == TokenKind::KeyIf {
                    // `else if` reads as `elif`.
                    self.cursor.advance();
                    Some(self.parse_conditional(ConditionalKind::Elif)?)
                } else {
                    Some(self.parse_conditional(ConditionalKind::Else)?)
                }
            }
            _ => None,
        };
        Ok(Conditional {
            kind,
            condition,
            body,
            else_node: else_node.map(Box::new),
            pos: self.span_from(start),
        })
    }

    /// `switch expr { value { ... } ... else { ... } }`
    fn parse_switch(&mut self) -> PResult<Expr> {
        let start = self.cursor.advance().pos;
        let scrutinee = self.parse_expr()?;
        self.expect(TokenKind::OpenBrace)?;
        let mut cases = Vec::new();
        let mut default = None;
        while !self.cursor.check(TokenKind::CloseBrace) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected_eof());
            }
            if self.cursor.eat(TokenKind::KeyElse) {
                default = Some(self.parse_block()?);
                continue;
            }
            let value = self.parse_expr()?;
            let body = self.parse_block()?;
            cases.push(SwitchCase { value, body });
        }
        self.expect(TokenKind::CloseBrace)?;
        Ok(Expr::new(
            ExprKind::Switch {
                scrutinee: Box::new(scrutinee),
                cases,
                default,
            },
            self.span_from(start),
        ))
    }

    /// `new [T, size] { e, ... }`, `new T { f: e, ... }` or `new { ... }`.
    fn parse_new(&mut self) -> PResult<Expr> {
        let start = self.cursor.advance().pos;
        if self.cursor.eat(TokenKind::OpenBracket) {
            let elem = self.parse_type()?;
            let size = if self.cursor.eat(TokenKind::Comma) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.expect(TokenKind::CloseBracket)?;
            self.expect(TokenKind::OpenBrace)?;
            let elements = self.comma_list(TokenKind::CloseBrace, |p| p.parse_expr())?;
            return Ok(Expr::new(
                ExprKind::ArrayAlloc {
                    elem,
                    size,
                    elements,
                },
                self.span_from(start),
            ));
        }
        let ty = if self.cursor.check(TokenKind::OpenBrace) {
            None
        } else {
            Some(self.parse_type()?)
        };
        self.expect(TokenKind::OpenBrace)?;
        let fields = self.comma_list(TokenKind::CloseBrace, |p| {
            let name = p.expect_ident()?;
            p.expect(TokenKind::Colon)?;
            let value = p.parse_expr()?;
            Ok(FieldInit { name, value })
        })?;
        Ok(Expr::new(
            ExprKind::TypeAlloc { ty, fields },
            self.span_from(start),
        ))
    }
}
