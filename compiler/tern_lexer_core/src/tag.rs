//! Raw token tags.

/// What the scanner saw, before keyword lookup and literal cooking.
///
/// Malformed literals get their own tags (`Unterminated*`,
/// `NumberWithExtraDot`) so the cooker can report them without rescanning.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawTag {
    // Trivia
    /// Spaces, tabs, lone `\r` and other control bytes.
    Whitespace,
    /// `\n` or `\r\n`.
    Newline,
    LineComment,
    /// `/* ... */`, not nested. May contain line breaks.
    BlockComment,
    /// `/*` without a closing `*/`; runs to EOF.
    UnterminatedBlockComment,

    // Names and literals
    Ident,
    /// Digits and `_`, with at most one fractional part and an optional
    /// trailing `f`.
    Number,
    /// A number with a second fractional `.`, e.g. `1.2.3`.
    NumberWithExtraDot,
    String,
    UnterminatedString,
    Char,
    UnterminatedChar,
    /// `` `name` ``
    Backtick,
    UnterminatedBacktick,

    // Delimiters
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    Semicolon,

    // Operators
    Dot,
    DotDot,
    Equal,
    EqualEqual,
    Bang,
    BangEqual,
    Plus,
    PlusPlus,
    PlusEqual,
    Minus,
    MinusMinus,
    MinusEqual,
    Star,
    StarEqual,
    Slash,
    SlashEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Ampersand,
    AmpersandAmpersand,
    Pipe,
    PipePipe,
    Question,

    /// A byte (or UTF-8 sequence) that starts no token.
    Unknown,
    Eof,
}

impl RawTag {
    /// Tokens the cooker drops. Newlines are kept apart because they
    /// mark the next token as starting a new line.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            RawTag::Whitespace
                | RawTag::LineComment
                | RawTag::BlockComment
                | RawTag::UnterminatedBlockComment
        )
    }
}

/// One scanned token: a tag and its byte length. The start offset is the
/// sum of the lengths before it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_excludes_newline() {
        assert!(RawTag::Whitespace.is_trivia());
        assert!(RawTag::BlockComment.is_trivia());
        assert!(!RawTag::Newline.is_trivia());
        assert!(!RawTag::Ident.is_trivia());
    }
}
