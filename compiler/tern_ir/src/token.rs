//! Token kinds and tokens produced by the lexer.

use std::fmt;

use crate::Pos;

/// Closed set of token kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Identifier,
    ConstantDigit,
    ConstantFloatDigit,
    ConstantString,
    ConstantChar,
    ConstantBoolean,

    // Keywords
    KeyReturn,
    KeyContinue,
    KeyBreak,
    KeyWhile,
    KeyPub,
    KeyPriv,
    KeyUse,
    KeyImport,
    KeyNew,
    KeyFor,
    KeyType,
    KeyEnum,
    KeyAs,
    KeyIs,
    KeyIn,
    KeyIf,
    KeyElif,
    KeyElse,
    KeyFn,
    KeyVar,
    KeyConst,
    KeyCatch,
    KeySwitch,
    KeyTry,

    // Punctuation
    OpenPar,
    ClosePar,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Equal,
    Plus,
    Minus,
    Star,
    Slash,
    Negation,
    Ampersand,
    Pipe,
    QuestionMark,
    BooleanLess,
    BooleanGreater,

    // Double-character operators
    BooleanEq,
    BooleanNeq,
    BooleanLeq,
    BooleanGeq,
    BooleanAnd,
    BooleanOr,
    RangeDots,
    AddAssignment,
    SubAssignment,
    MulAssignment,
    DivAssignment,
    Increment,
    Decrement,

    /// Synthetic end-of-file token.
    Eof,
    /// A character the lexer could not classify.
    Bad,
}

impl TokenKind {
    /// Resolve a reserved word. `true`/`false` are literals, not keywords,
    /// and are handled by the lexer.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "return" => TokenKind::KeyReturn,
            "continue" => TokenKind::KeyContinue,
            "break" => TokenKind::KeyBreak,
            "while" => TokenKind::KeyWhile,
            "pub" => TokenKind::KeyPub,
            "priv" => TokenKind::KeyPriv,
            "use" => TokenKind::KeyUse,
            "import" => TokenKind::KeyImport,
            "new" => TokenKind::KeyNew,
            "for" => TokenKind::KeyFor,
            "type" => TokenKind::KeyType,
            "enum" => TokenKind::KeyEnum,
            "as" => TokenKind::KeyAs,
            "is" => TokenKind::KeyIs,
            "in" => TokenKind::KeyIn,
            "and" => TokenKind::BooleanAnd,
            "or" => TokenKind::BooleanOr,
            "if" => TokenKind::KeyIf,
            "elif" => TokenKind::KeyElif,
            "else" => TokenKind::KeyElse,
            "fn" => TokenKind::KeyFn,
            "var" => TokenKind::KeyVar,
            "const" => TokenKind::KeyConst,
            "catch" => TokenKind::KeyCatch,
            "switch" => TokenKind::KeySwitch,
            "try" => TokenKind::KeyTry,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed spelling of the token, or a description for value-carrying kinds.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::ConstantDigit => "constant digit",
            TokenKind::ConstantFloatDigit => "constant float",
            TokenKind::ConstantString => "constant string",
            TokenKind::ConstantChar => "constant char",
            TokenKind::ConstantBoolean => "constant boolean",
            TokenKind::KeyReturn => "return",
            TokenKind::KeyContinue => "continue",
            TokenKind::KeyBreak => "break",
            TokenKind::KeyWhile => "while",
            TokenKind::KeyPub => "pub",
            TokenKind::KeyPriv => "priv",
            TokenKind::KeyUse => "use",
            TokenKind::KeyImport => "import",
            TokenKind::KeyNew => "new",
            TokenKind::KeyFor => "for",
            TokenKind::KeyType => "type",
            TokenKind::KeyEnum => "enum",
            TokenKind::KeyAs => "as",
            TokenKind::KeyIs => "is",
            TokenKind::KeyIn => "in",
            TokenKind::KeyIf => "if",
            TokenKind::KeyElif => "elif",
            TokenKind::KeyElse => "else",
            TokenKind::KeyFn => "fn",
            TokenKind::KeyVar => "var",
            TokenKind::KeyConst => "const",
            TokenKind::KeyCatch => "catch",
            TokenKind::KeySwitch => "switch",
            TokenKind::KeyTry => "try",
            TokenKind::OpenPar => "(",
            TokenKind::ClosePar => ")",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Equal => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Negation => "!",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::QuestionMark => "?",
            TokenKind::BooleanLess => "<",
            TokenKind::BooleanGreater => ">",
            TokenKind::BooleanEq => "==",
            TokenKind::BooleanNeq => "!=",
            TokenKind::BooleanLeq => "<=",
            TokenKind::BooleanGeq => ">=",
            TokenKind::BooleanAnd => "&&",
            TokenKind::BooleanOr => "||",
            TokenKind::RangeDots => "..",
            TokenKind::AddAssignment => "+=",
            TokenKind::SubAssignment => "-=",
            TokenKind::MulAssignment => "*=",
            TokenKind::DivAssignment => "/=",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Eof => "<EOF>",
            TokenKind::Bad => "bad token",
        }
    }

    /// Literal kinds whose token value is the constant itself.
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            TokenKind::ConstantDigit
                | TokenKind::ConstantFloatDigit
                | TokenKind::ConstantString
                | TokenKind::ConstantChar
                | TokenKind::ConstantBoolean
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexed token.
///
/// `value` is the source text of the token, except for quoted literals
/// (cooked contents without quotes), backtick names (text between the
/// backticks) and numbers (digit separators removed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Pos,
    /// At least one line break separates this token from the previous one.
    pub on_new_line: bool,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: Pos, on_new_line: bool) -> Self {
        Token {
            kind,
            value: value.into(),
            pos,
            on_new_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table() {
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::KeyFn));
        assert_eq!(TokenKind::keyword("and"), Some(TokenKind::BooleanAnd));
        assert_eq!(TokenKind::keyword("or"), Some(TokenKind::BooleanOr));
        assert_eq!(TokenKind::keyword("true"), None);
        assert_eq!(TokenKind::keyword("main"), None);
    }

    #[test]
    fn test_keyword_spelling_roundtrips() {
        for word in ["return", "elif", "switch", "import", "catch", "try"] {
            let Some(kind) = TokenKind::keyword(word) else {
                panic!("{word} should be a keyword");
            };
            assert_eq!(kind.as_str(), word);
        }
    }
}
