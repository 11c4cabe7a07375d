//! Lexical errors, converted to diagnostics once a source is scanned.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{Pos, SourceId, Span};

/// A lexer error: where, and what went wrong.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum LexErrorKind {
    UnterminatedString,
    UnterminatedChar,
    UnterminatedBacktick,
    /// `\q` and friends. Carries the character after the backslash.
    InvalidEscape(char),
    EmptyChar,
    MultiChar,
    /// Numeric constant with 21 or more digits.
    ConstantOverflow,
    /// Second fractional dot, as in `1.2.3`.
    ExtraDot,
    EmptyBacktick,
    InvalidBacktick,
    UnknownChar,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }

    fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString
            | LexErrorKind::UnterminatedChar
            | LexErrorKind::UnterminatedBacktick => ErrorCode::E0001,
            LexErrorKind::InvalidEscape(_) => ErrorCode::E0002,
            LexErrorKind::EmptyChar | LexErrorKind::MultiChar => ErrorCode::E0003,
            LexErrorKind::ConstantOverflow => ErrorCode::E0004,
            LexErrorKind::EmptyBacktick | LexErrorKind::InvalidBacktick => ErrorCode::E0005,
            LexErrorKind::ExtraDot => ErrorCode::E0006,
            LexErrorKind::UnknownChar => ErrorCode::E0007,
        }
    }

    fn message(&self) -> String {
        match &self.kind {
            LexErrorKind::UnterminatedString => {
                "constant string has not been correctly enclosed".to_string()
            }
            LexErrorKind::UnterminatedChar => {
                "constant char has not been correctly enclosed".to_string()
            }
            LexErrorKind::UnterminatedBacktick => {
                "backtick sequence has not been correctly enclosed".to_string()
            }
            LexErrorKind::InvalidEscape(c) => {
                format!("unable to recognize escaped char '\\{}'", c.escape_default())
            }
            LexErrorKind::EmptyChar => "not enough characters in constant char".to_string(),
            LexErrorKind::MultiChar => "too many characters in constant char".to_string(),
            LexErrorKind::ConstantOverflow => "constant overflow".to_string(),
            LexErrorKind::ExtraDot => "invalid dot here".to_string(),
            LexErrorKind::EmptyBacktick => {
                "not enough characters in backtick sequence".to_string()
            }
            LexErrorKind::InvalidBacktick => "invalid backtick sequence".to_string(),
            LexErrorKind::UnknownChar => "unknown character".to_string(),
        }
    }

    pub fn into_diagnostic(self, source: SourceId) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.message())
            .with_pos(Pos::new(source, self.span));
        match self.kind {
            LexErrorKind::InvalidEscape(_) => {
                diag.with_note("valid escapes are \\n \\t \\r \\0 \\' \\\" \\\\")
            }
            LexErrorKind::InvalidBacktick => diag.with_note(
                "a backtick name is a keyword, an identifier, or made of `[ ] ! - + * / = $ ^ ~`",
            ),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_codes_and_messages() {
        let diag = LexError::new(LexErrorKind::InvalidEscape('q'), Span::new(1, 3))
            .into_diagnostic(SourceId(2));
        assert_eq!(diag.code, ErrorCode::E0002);
        assert_eq!(diag.message, "unable to recognize escaped char '\\q'");
        assert_eq!(diag.pos, Some(Pos::new(SourceId(2), Span::new(1, 3))));
        assert_eq!(diag.notes.len(), 1);

        let diag = LexError::new(LexErrorKind::UnknownChar, Span::new(0, 1))
            .into_diagnostic(SourceId(0));
        assert_eq!(diag.code, ErrorCode::E0007);
        assert!(diag.notes.is_empty());
    }
}
