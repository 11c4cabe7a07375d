//! Token cursor for navigating the token stream.

use tern_ir::{Pos, SourceId, Span, Token, TokenKind};

/// Stand-in returned if a caller hands over a stream without `Eof`.
static MISSING_EOF: Token = Token {
    kind: TokenKind::Eof,
    value: String::new(),
    pos: Pos::new(SourceId(0), Span::DUMMY),
    on_new_line: false,
};

/// Position in a token slice. The slice ends with `Eof`; the cursor never
/// moves past it.
#[derive(Clone, Copy)]
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Used by `Parser::restore`.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len(), "cursor position out of bounds");
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&MISSING_EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_pos(&self) -> Pos {
        self.current().pos
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Position of the last consumed token, or of the current one at the
    /// start of the stream.
    pub fn previous_pos(&self) -> Pos {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.pos,
            None => self.current_pos(),
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// `check`, but only when no line break precedes the current token.
    #[inline]
    pub fn check_same_line(&self, kind: TokenKind) -> bool {
        self.check(kind) && !self.current().on_new_line
    }

    /// Consume and return the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_same_line(&mut self, kind: TokenKind) -> bool {
        if self.check_same_line(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, start: u32, on_new_line: bool) -> Token {
        Token::new(
            kind,
            kind.as_str(),
            Pos::new(SourceId(0), Span::new(start, start + 1)),
            on_new_line,
        )
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let tokens = vec![
            token(TokenKind::Identifier, 0, false),
            token(TokenKind::Eof, 1, false),
        ];
        let mut cursor = Cursor::new(&tokens);
        assert_eq!(cursor.advance().kind, TokenKind::Identifier);
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.previous_pos().span, Span::new(0, 1));
    }

    #[test]
    fn test_same_line_checks() {
        let tokens = vec![
            token(TokenKind::Identifier, 0, false),
            token(TokenKind::OpenPar, 2, true),
            token(TokenKind::Eof, 3, false),
        ];
        let mut cursor = Cursor::new(&tokens);
        cursor.advance();
        assert!(cursor.check(TokenKind::OpenPar));
        assert!(!cursor.check_same_line(TokenKind::OpenPar));
        assert!(!cursor.eat_same_line(TokenKind::OpenPar));
        assert!(cursor.eat(TokenKind::OpenPar));
        assert_eq!(cursor.peek_kind(), TokenKind::Eof);
    }

    #[test]
    fn test_empty_stream_reads_as_eof() {
        let cursor = Cursor::new(&[]);
        assert!(cursor.is_at_end());
    }
}
