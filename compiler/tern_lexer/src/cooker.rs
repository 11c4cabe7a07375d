//! Token cooking: raw `(tag, len)` pairs to `(TokenKind, value)`.
//!
//! ```text
//! source → RawScanner → (RawTag, len) → TokenCooker → Token
//! ```
//!
//! - operators and delimiters map 1:1
//! - identifiers go through the keyword table
//! - numbers drop `_` and are checked for length and extra dots
//! - strings and chars are unescaped
//! - backtick names are validated
//!
//! Problems are collected as [`LexError`]s; cooking always yields a token.

use tern_ir::{Span, TokenKind};
use tern_lexer_core::RawTag;

use crate::cook_escape::unescape;
use crate::lex_error::{LexError, LexErrorKind};

/// Digits a numeric constant may have before it is reported.
const MAX_NUMBER_LEN: usize = 20;

/// Characters a backtick name may be built from when it is not a plain
/// identifier or keyword.
const BACKTICK_SYMBOLS: &[char] = &['[', ']', '!', '-', '+', '*', '/', '=', '$', '^', '~'];

pub(crate) struct TokenCooker<'src> {
    text: &'src str,
    errors: Vec<LexError>,
}

impl<'src> TokenCooker<'src> {
    pub fn new(text: &'src str) -> Self {
        TokenCooker {
            text,
            errors: Vec::new(),
        }
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        self.text
            .get(start as usize..end as usize)
            .unwrap_or_default()
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) {
        self.errors.push(LexError::new(kind, span));
    }

    /// Cook the token at `offset..offset + len`. Trivia and newlines are
    /// handled by the caller and never reach here.
    pub fn cook(&mut self, tag: RawTag, offset: u32, len: u32) -> (TokenKind, String) {
        let span = Span::new(offset, offset + len);
        let text = self.slice(span.start, span.end);
        let kind = match tag {
            RawTag::Ident => return (ident_kind(text), text.to_string()),
            RawTag::Number | RawTag::NumberWithExtraDot => return self.number(tag, span),
            RawTag::String | RawTag::UnterminatedString => return self.string(tag, span),
            RawTag::Char | RawTag::UnterminatedChar => return self.char_literal(tag, span),
            RawTag::Backtick | RawTag::UnterminatedBacktick => return self.backtick(tag, span),

            RawTag::OpenParen => TokenKind::OpenPar,
            RawTag::CloseParen => TokenKind::ClosePar,
            RawTag::OpenBrace => TokenKind::OpenBrace,
            RawTag::CloseBrace => TokenKind::CloseBrace,
            RawTag::OpenBracket => TokenKind::OpenBracket,
            RawTag::CloseBracket => TokenKind::CloseBracket,
            RawTag::Comma => TokenKind::Comma,
            RawTag::Colon => TokenKind::Colon,
            RawTag::Semicolon => TokenKind::Semicolon,
            RawTag::Dot => TokenKind::Dot,
            RawTag::DotDot => TokenKind::RangeDots,
            RawTag::Equal => TokenKind::Equal,
            RawTag::EqualEqual => TokenKind::BooleanEq,
            RawTag::Bang => TokenKind::Negation,
            RawTag::BangEqual => TokenKind::BooleanNeq,
            RawTag::Plus => TokenKind::Plus,
            RawTag::PlusPlus => TokenKind::Increment,
            RawTag::PlusEqual => TokenKind::AddAssignment,
            RawTag::Minus => TokenKind::Minus,
            RawTag::MinusMinus => TokenKind::Decrement,
            RawTag::MinusEqual => TokenKind::SubAssignment,
            RawTag::Star => TokenKind::Star,
            RawTag::StarEqual => TokenKind::MulAssignment,
            RawTag::Slash => TokenKind::Slash,
            RawTag::SlashEqual => TokenKind::DivAssignment,
            RawTag::Less => TokenKind::BooleanLess,
            RawTag::LessEqual => TokenKind::BooleanLeq,
            RawTag::Greater => TokenKind::BooleanGreater,
            RawTag::GreaterEqual => TokenKind::BooleanGeq,
            RawTag::Ampersand => TokenKind::Ampersand,
            RawTag::AmpersandAmpersand => TokenKind::BooleanAnd,
            RawTag::Pipe => TokenKind::Pipe,
            RawTag::PipePipe => TokenKind::BooleanOr,
            RawTag::Question => TokenKind::QuestionMark,

            RawTag::Unknown => {
                self.error(LexErrorKind::UnknownChar, span);
                TokenKind::Bad
            }
            // Not produced for cooked positions; kept total for the match.
            RawTag::Whitespace
            | RawTag::Newline
            | RawTag::LineComment
            | RawTag::BlockComment
            | RawTag::UnterminatedBlockComment
            | RawTag::Eof => TokenKind::Bad,
        };
        (kind, text.to_string())
    }

    fn number(&mut self, tag: RawTag, span: Span) -> (TokenKind, String) {
        let text = self.slice(span.start, span.end);
        let (body, suffixed) = match text.strip_suffix('f') {
            Some(body) => (body, true),
            None => (text, false),
        };
        let value: String = body.chars().filter(|&c| c != '_').collect();
        if value.len() > MAX_NUMBER_LEN {
            self.error(LexErrorKind::ConstantOverflow, span);
        }
        if tag == RawTag::NumberWithExtraDot {
            self.error(LexErrorKind::ExtraDot, span);
        }
        let kind = if suffixed || value.contains('.') {
            TokenKind::ConstantFloatDigit
        } else {
            TokenKind::ConstantDigit
        };
        (kind, value)
    }

    /// Text between the delimiters, and whether the closing one is there.
    fn quoted_body(&self, span: Span, closed: bool) -> (&'src str, u32) {
        let start = span.start + 1;
        let end = if closed { span.end - 1 } else { span.end };
        (self.slice(start, end.max(start)), start)
    }

    fn string(&mut self, tag: RawTag, span: Span) -> (TokenKind, String) {
        let closed = tag == RawTag::String;
        if !closed {
            self.error(LexErrorKind::UnterminatedString, span);
        }
        let (body, base) = self.quoted_body(span, closed);
        let value = unescape(body, base, &mut self.errors);
        (TokenKind::ConstantString, value)
    }

    fn char_literal(&mut self, tag: RawTag, span: Span) -> (TokenKind, String) {
        let closed = tag == RawTag::Char;
        let (body, base) = self.quoted_body(span, closed);
        let value = unescape(body, base, &mut self.errors);
        if closed {
            match value.chars().count() {
                0 => self.error(LexErrorKind::EmptyChar, span),
                1 => {}
                _ => self.error(LexErrorKind::MultiChar, span),
            }
        } else {
            self.error(LexErrorKind::UnterminatedChar, span);
        }
        (TokenKind::ConstantChar, value)
    }

    fn backtick(&mut self, tag: RawTag, span: Span) -> (TokenKind, String) {
        let closed = tag == RawTag::Backtick;
        let (body, _) = self.quoted_body(span, closed);
        if !closed {
            self.error(LexErrorKind::UnterminatedBacktick, span);
        } else if body.is_empty() {
            self.error(LexErrorKind::EmptyBacktick, span);
        } else if !is_valid_backtick_name(body) {
            self.error(LexErrorKind::InvalidBacktick, span);
        }
        (TokenKind::Identifier, body.to_string())
    }
}

fn ident_kind(word: &str) -> TokenKind {
    match word {
        "true" | "false" => TokenKind::ConstantBoolean,
        _ => TokenKind::keyword(word).unwrap_or(TokenKind::Identifier),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_valid_backtick_name(name: &str) -> bool {
    is_identifier(name) || name.chars().all(|c| BACKTICK_SYMBOLS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_names() {
        assert!(is_valid_backtick_name("new"));
        assert!(is_valid_backtick_name("my_name"));
        assert!(is_valid_backtick_name("+"));
        assert!(is_valid_backtick_name("[]="));
        assert!(!is_valid_backtick_name("a b"));
        assert!(!is_valid_backtick_name("+a"));
        assert!(!is_valid_backtick_name("9lives"));
    }

    #[test]
    fn test_ident_kinds() {
        assert_eq!(ident_kind("true"), TokenKind::ConstantBoolean);
        assert_eq!(ident_kind("and"), TokenKind::BooleanAnd);
        assert_eq!(ident_kind("switch"), TokenKind::KeySwitch);
        assert_eq!(ident_kind("x"), TokenKind::Identifier);
    }
}
