//! Token sets used to decide where recovery stops.

use tern_ir::TokenKind;

/// Bitset over `TokenKind` discriminants (fewer than 128 kinds).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TokenSet(u128);

impl TokenSet {
    pub const fn new() -> Self {
        TokenSet(0)
    }

    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | (1u128 << kind as u8))
    }

    #[inline]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u128 << kind as u8) != 0
    }
}

/// Tokens that may begin a namespace member.
pub(crate) const MEMBER_START: TokenSet = TokenSet::new()
    .with(TokenKind::OpenBracket)
    .with(TokenKind::KeyPub)
    .with(TokenKind::KeyPriv)
    .with(TokenKind::KeyFn)
    .with(TokenKind::KeyType)
    .with(TokenKind::KeyEnum)
    .with(TokenKind::KeyVar)
    .with(TokenKind::KeyConst)
    .with(TokenKind::KeyImport)
    .with(TokenKind::KeyUse);

/// Closers a failed expression leaves in place for the enclosing
/// construct to consume.
pub(crate) const EXPR_RECOVERY: TokenSet = TokenSet::new()
    .with(TokenKind::CloseBrace)
    .with(TokenKind::ClosePar)
    .with(TokenKind::CloseBracket)
    .with(TokenKind::Eof);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        assert!(MEMBER_START.contains(TokenKind::KeyFn));
        assert!(!MEMBER_START.contains(TokenKind::Identifier));
        assert!(EXPR_RECOVERY.contains(TokenKind::Eof));
        assert!(!EXPR_RECOVERY.contains(TokenKind::Comma));
    }

    #[test]
    fn test_every_kind_fits() {
        assert!((TokenKind::Bad as u8) < 128);
    }
}
