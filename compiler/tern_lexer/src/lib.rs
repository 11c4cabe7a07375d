//! Lexer for Tern.
//!
//! [`tokenize`] runs the raw scanner from `tern_lexer_core` over one
//! source, cooks every non-trivia token and reports lexical errors into
//! the bag. It never fails: malformed input still yields tokens, and the
//! result always ends with a single [`TokenKind::Eof`].

mod cook_escape;
mod cooker;
mod lex_error;

use tern_diagnostic::DiagnosticBag;
use tern_ir::{Pos, Source, SourceId, Span, Token, TokenKind};
use tern_lexer_core::{RawScanner, RawTag, SourceBuffer};
use tracing::debug;

use crate::cooker::TokenCooker;

/// Lex `source` into tokens.
///
/// The final token is `Eof` with value `"<EOF>"` at `len..len + 1`.
#[tracing::instrument(level = "debug", skip_all, fields(source = source.name()))]
pub fn tokenize(source_id: SourceId, source: &Source, bag: &mut DiagnosticBag) -> Vec<Token> {
    let buffer = SourceBuffer::new(source.text());
    let mut scanner = RawScanner::new(buffer.cursor());
    let mut cooker = TokenCooker::new(source.text());
    let mut tokens = Vec::with_capacity(source.text().len() / 4 + 1);
    let mut on_new_line = false;

    loop {
        let start = scanner.pos();
        let raw = scanner.next_token();
        match raw.tag {
            RawTag::Eof => break,
            RawTag::Newline => on_new_line = true,
            RawTag::BlockComment | RawTag::UnterminatedBlockComment => {
                if cooker.slice(start, start + raw.len).contains('\n') {
                    on_new_line = true;
                }
            }
            tag if tag.is_trivia() => {}
            tag => {
                let (kind, value) = cooker.cook(tag, start, raw.len);
                let pos = Pos::new(source_id, Span::new(start, start + raw.len));
                tokens.push(Token::new(kind, value, pos, on_new_line));
                on_new_line = false;
            }
        }
    }

    let len = buffer.len();
    tokens.push(Token::new(
        TokenKind::Eof,
        TokenKind::Eof.as_str(),
        Pos::new(source_id, Span::new(len, len.saturating_add(1))),
        on_new_line,
    ));

    for error in cooker.into_errors() {
        bag.report(error.into_diagnostic(source_id));
    }
    debug!(count = tokens.len(), "tokenized");
    tokens
}

#[cfg(test)]
mod tests;
