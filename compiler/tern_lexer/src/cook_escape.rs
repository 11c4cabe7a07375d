//! Escape processing for string and char literals.
//!
//! Both literal kinds accept the same set: `\n` `\t` `\r` `\0` `\'` `\"`
//! `\\`. Anything else is reported and the escaped character is kept as
//! written.

use tern_ir::Span;

use crate::lex_error::{LexError, LexErrorKind};

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        '0' => Some('\0'),
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Cook the text between the quotes. `base_offset` is the byte offset of
/// `content` in the source, used to place escape errors.
#[allow(
    clippy::cast_possible_truncation,
    reason = "offsets inside one literal are bounded by the source length, a u32"
)]
pub(crate) fn unescape(content: &str, base_offset: u32, errors: &mut Vec<LexError>) -> String {
    if !content.contains('\\') {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let start = base_offset + i as u32;
        match chars.next() {
            Some((j, esc)) => {
                if let Some(resolved) = resolve_escape(esc) {
                    out.push(resolved);
                } else {
                    let end = base_offset + j as u32 + esc.len_utf8() as u32;
                    errors.push(LexError::new(
                        LexErrorKind::InvalidEscape(esc),
                        Span::new(start, end),
                    ));
                    out.push(esc);
                }
            }
            // Only reachable for unterminated literals.
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_content_is_copied() {
        let mut errors = Vec::new();
        assert_eq!(unescape("hello", 0, &mut errors), "hello");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_all_escapes() {
        let mut errors = Vec::new();
        assert_eq!(
            unescape(r#"\n\t\r\0\'\"\\"#, 0, &mut errors),
            "\n\t\r\0'\"\\"
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unknown_escape_is_reported_and_kept() {
        let mut errors = Vec::new();
        assert_eq!(unescape(r"a\qb", 10, &mut errors), "aqb");
        assert_eq!(
            errors,
            vec![LexError::new(
                LexErrorKind::InvalidEscape('q'),
                Span::new(11, 13)
            )]
        );
    }
}
