//! Parser snapshots for speculative parsing.
//!
//! Prefer plain lookahead (`check`, `peek_kind`) when one or two tokens
//! decide the branch. Speculate only when the decision needs a full parse,
//! as with call-site generics `f<i32>(x)` against the comparison `a < b`.

use tern_diagnostic::BagMark;

use crate::{PResult, Parser};

/// Everything a failed attempt can disturb: the cursor and the bag.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ParserSnapshot {
    cursor_pos: usize,
    bag: BagMark,
}

impl Parser<'_> {
    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            cursor_pos: self.cursor.position(),
            bag: self.bag.mark(),
        }
    }

    /// Rewind to `snapshot`, discarding diagnostics reported since.
    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.cursor_pos);
        self.bag.rollback(snapshot.bag);
    }

    /// Run `f` and keep its result only if it returned `Some` without
    /// reporting an error. Otherwise rewind and return `None`.
    pub(crate) fn speculate<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<Option<T>>,
    ) -> Option<T> {
        let snapshot = self.snapshot();
        let errors_before = self.bag.error_count() + self.bag.suppressed_count();
        match f(self) {
            Ok(Some(value))
                if self.bag.error_count() + self.bag.suppressed_count() == errors_before =>
            {
                Some(value)
            }
            _ => {
                self.restore(snapshot);
                None
            }
        }
    }
}
