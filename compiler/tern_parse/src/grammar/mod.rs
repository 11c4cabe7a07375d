//! Grammar productions, split by syntactic category.

mod expr;
mod item;
mod stmt;
mod ty;

use tern_ir::TokenKind;

use crate::{PResult, Parser};

impl Parser<'_> {
    /// Items separated by `,` up to and including `close`. A trailing comma
    /// is allowed.
    pub(crate) fn comma_list<T>(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<Vec<T>> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected_eof());
            }
            items.push(item(self)?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }
}
