//! Blocks and statements.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{Block, ForLoop, Stmt, StmtKind, VarDecl};
use tern_ir::TokenKind;

use crate::{PResult, Parser};

impl Parser<'_> {
    /// `{ stmt* }`. Statements go on separate lines; a `;` lets two share
    /// one without a warning.
    pub(crate) fn parse_block(&mut self) -> PResult<Block> {
        let start = self.expect(TokenKind::OpenBrace)?;
        let mut stmts = Vec::new();
        let mut separated = true;
        while !self.cursor.check(TokenKind::CloseBrace) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected_eof());
            }
            let first = self.cursor.current();
            if !separated && !first.on_new_line {
                self.bag.warning(
                    ErrorCode::W1001,
                    first.pos,
                    "maintain statements on different lines",
                );
            }
            let before = self.cursor.position();
            stmts.push(self.parse_stmt()?);
            if self.cursor.position() == before {
                // Nothing consumed: the error is reported, skip the token.
                self.cursor.advance();
            }
            separated = false;
            while self.cursor.eat(TokenKind::Semicolon) {
                separated = true;
            }
        }
        self.cursor.advance();
        Ok(Block {
            stmts,
            pos: self.span_from(start),
        })
    }

    pub(crate) fn parse_stmt(&mut self) -> PResult<Stmt> {
        let start = self.cursor.current_pos();
        let kind = match self.cursor.current_kind() {
            TokenKind::KeyVar | TokenKind::KeyConst => StmtKind::Var(self.parse_var_decl()?),
            TokenKind::KeyReturn => {
                self.cursor.advance();
                let next = self.cursor.current();
                let has_value = !next.on_new_line
                    && !matches!(
                        next.kind,
                        TokenKind::CloseBrace | TokenKind::Semicolon | TokenKind::Eof
                    );
                StmtKind::Return(if has_value {
                    Some(self.parse_expr()?)
                } else {
                    None
                })
            }
            TokenKind::KeyFor => StmtKind::For(self.parse_for()?),
            TokenKind::KeyBreak => {
                self.cursor.advance();
                StmtKind::Break
            }
            TokenKind::KeyContinue => {
                self.cursor.advance();
                StmtKind::Continue
            }
            _ => StmtKind::Expr(self.parse_expr()?),
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    /// `var name[: T] [= expr]`, or the same with `const`.
    pub(crate) fn parse_var_decl(&mut self) -> PResult<VarDecl> {
        let is_const = self.cursor.advance().kind == TokenKind::KeyConst;
        let name = self.expect_ident()?;
        let ty = if self.cursor.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let value = if self.cursor.eat(TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(VarDecl {
            name,
            ty,
            value,
            is_const,
        })
    }

    /// `for [init], [condition], [step] { body }`
    fn parse_for(&mut self) -> PResult<ForLoop> {
        self.cursor.advance();
        let init = if self.cursor.check(TokenKind::Comma) {
            None
        } else {
            Some(Box::new(self.parse_stmt()?))
        };
        self.expect(TokenKind::Comma)?;
        let condition = if self.cursor.check(TokenKind::Comma) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Comma)?;
        let step = if self.cursor.check(TokenKind::OpenBrace) {
            None
        } else {
            Some(Box::new(self.parse_stmt()?))
        };
        let body = self.parse_block()?;
        Ok(ForLoop {
            init,
            condition,
            step,
            body,
        })
    }
}
