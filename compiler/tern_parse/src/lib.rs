//! Recursive descent parser for Tern.
//!
//! Token stream in, [`Namespace`] out. The parser never stops at the first
//! syntax error: malformed constructs become `Bad` nodes and a diagnostic,
//! and parsing resumes at the next token. Only an end of file inside an
//! unfinished construct aborts.
//!
//! Statements have no terminator. Infix operators and most postfix forms
//! must stay on the line of the token before them; a line break ends the
//! expression instead.

mod cursor;
mod grammar;
mod recovery;
mod snapshot;

use cursor::Cursor;
use tern_diagnostic::{Aborted, DiagnosticBag, ErrorCode};
use tern_ir::ast::{Ident, Namespace};
use tern_ir::{Pos, Token, TokenKind};
use tracing::debug;

/// Result inside the parser. `Err` always means an unexpected EOF already
/// reported to the bag.
pub(crate) type PResult<T> = Result<T, Aborted>;

/// Parse a token stream produced by `tern_lexer::tokenize`.
///
/// Returns `Ok` even when syntax errors were reported; inspect the bag.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token], bag: &mut DiagnosticBag) -> Result<Namespace, Aborted> {
    let mut parser = Parser::new(tokens, bag);
    let namespace = parser.parse_namespace()?;
    debug!(members = namespace.members.len(), "parsed");
    Ok(namespace)
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    bag: &'a mut DiagnosticBag,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], bag: &'a mut DiagnosticBag) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            bag,
        }
    }

    /// Consume `kind` or report E1001. A wrong token is still skipped so
    /// the caller always makes progress; EOF aborts instead.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Pos> {
        if self.cursor.check(kind) {
            return Ok(self.cursor.advance().pos);
        }
        self.expected(kind.as_str())
    }

    /// Consume an identifier or report E1001 like [`Parser::expect`].
    pub(crate) fn expect_ident(&mut self) -> PResult<Ident> {
        if self.cursor.check(TokenKind::Identifier) {
            let token = self.cursor.advance();
            return Ok(Ident::new(token.value.as_str(), token.pos));
        }
        let pos = self.expected("identifier")?;
        Ok(Ident::new("", pos))
    }

    /// Report that `what` was expected at the current token and skip it.
    pub(crate) fn expected(&mut self, what: &str) -> PResult<Pos> {
        if self.cursor.is_at_end() {
            return Err(self.unexpected_eof());
        }
        let token = self.cursor.advance();
        self.bag.error(
            ErrorCode::E1001,
            token.pos,
            format!("expected '{what}', found '{}'", describe(token)),
        );
        Ok(token.pos)
    }

    /// Report E1002 at the current position.
    #[cold]
    pub(crate) fn unexpected_eof(&mut self) -> Aborted {
        self.bag.error(
            ErrorCode::E1002,
            self.cursor.current_pos(),
            "unexpected <EOF>",
        );
        Aborted::UnexpectedEof
    }

    /// Span from `start` through the last consumed token.
    pub(crate) fn span_from(&self, start: Pos) -> Pos {
        start.merge(self.cursor.previous_pos())
    }
}

/// How a token is named in messages: its text, or its kind when it has no
/// meaningful text.
pub(crate) fn describe(token: &Token) -> &str {
    if token.value.is_empty() {
        token.kind.as_str()
    } else {
        &token.value
    }
}

#[cfg(test)]
mod tests;
