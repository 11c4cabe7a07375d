use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::SourceBuffer;

fn scan(source: &str) -> Vec<(RawTag, u32)> {
    let buffer = SourceBuffer::new(source);
    let mut scanner = RawScanner::new(buffer.cursor());
    let mut out = Vec::new();
    loop {
        let token = scanner.next_token();
        if token.tag == RawTag::Eof {
            break;
        }
        out.push((token.tag, token.len));
    }
    out
}

fn tags(source: &str) -> Vec<RawTag> {
    scan(source)
        .into_iter()
        .map(|(tag, _)| tag)
        .filter(|tag| !tag.is_trivia())
        .collect()
}

#[test]
fn test_var_declaration() {
    assert_eq!(
        scan("var x = 0 "),
        vec![
            (RawTag::Ident, 3),
            (RawTag::Whitespace, 1),
            (RawTag::Ident, 1),
            (RawTag::Whitespace, 1),
            (RawTag::Equal, 1),
            (RawTag::Whitespace, 1),
            (RawTag::Number, 1),
            (RawTag::Whitespace, 1),
        ]
    );
}

#[test]
fn test_double_operators() {
    assert_eq!(
        tags("== != ++ += -- -= *= /= <= >= .. && ||"),
        vec![
            RawTag::EqualEqual,
            RawTag::BangEqual,
            RawTag::PlusPlus,
            RawTag::PlusEqual,
            RawTag::MinusMinus,
            RawTag::MinusEqual,
            RawTag::StarEqual,
            RawTag::SlashEqual,
            RawTag::LessEqual,
            RawTag::GreaterEqual,
            RawTag::DotDot,
            RawTag::AmpersandAmpersand,
            RawTag::PipePipe,
        ]
    );
}

#[test]
fn test_unmatched_pairs_fall_back() {
    assert_eq!(
        tags("= ! + - * / < > . & |"),
        vec![
            RawTag::Equal,
            RawTag::Bang,
            RawTag::Plus,
            RawTag::Minus,
            RawTag::Star,
            RawTag::Slash,
            RawTag::Less,
            RawTag::Greater,
            RawTag::Dot,
            RawTag::Ampersand,
            RawTag::Pipe,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(scan("1_000"), vec![(RawTag::Number, 5)]);
    assert_eq!(scan("3.14"), vec![(RawTag::Number, 4)]);
    assert_eq!(scan("2f"), vec![(RawTag::Number, 2)]);
    assert_eq!(scan("1.2.3"), vec![(RawTag::NumberWithExtraDot, 5)]);
}

#[test]
fn test_range_is_not_a_fraction() {
    assert_eq!(
        scan("1..2"),
        vec![(RawTag::Number, 1), (RawTag::DotDot, 2), (RawTag::Number, 1)]
    );
    assert_eq!(
        scan("1.x"),
        vec![(RawTag::Number, 1), (RawTag::Dot, 1), (RawTag::Ident, 1)]
    );
}

#[test]
fn test_strings_and_chars() {
    assert_eq!(scan(r#""a\"b""#), vec![(RawTag::String, 6)]);
    assert_eq!(scan(r"'\''"), vec![(RawTag::Char, 4)]);
    assert_eq!(scan("\"abc"), vec![(RawTag::UnterminatedString, 4)]);
    assert_eq!(
        scan("'a\nx"),
        vec![
            (RawTag::UnterminatedChar, 2),
            (RawTag::Newline, 1),
            (RawTag::Ident, 1)
        ]
    );
}

#[test]
fn test_backticks() {
    assert_eq!(scan("`+`"), vec![(RawTag::Backtick, 3)]);
    assert_eq!(scan("``"), vec![(RawTag::Backtick, 2)]);
    assert_eq!(scan("`abc"), vec![(RawTag::UnterminatedBacktick, 4)]);
}

#[test]
fn test_comments() {
    assert_eq!(
        scan("a // c\nb"),
        vec![
            (RawTag::Ident, 1),
            (RawTag::Whitespace, 1),
            (RawTag::LineComment, 4),
            (RawTag::Newline, 1),
            (RawTag::Ident, 1),
        ]
    );
    assert_eq!(scan("/* x\n y */"), vec![(RawTag::BlockComment, 10)]);
    assert_eq!(scan("/* open"), vec![(RawTag::UnterminatedBlockComment, 7)]);
}

#[test]
fn test_newlines() {
    assert_eq!(
        scan("a\r\nb\rc"),
        vec![
            (RawTag::Ident, 1),
            (RawTag::Newline, 2),
            (RawTag::Ident, 1),
            (RawTag::Whitespace, 1),
            (RawTag::Ident, 1),
        ]
    );
}

#[test]
fn test_unknown_bytes() {
    assert_eq!(scan("@"), vec![(RawTag::Unknown, 1)]);
    assert_eq!(scan("é"), vec![(RawTag::Unknown, 2)]);
    assert_eq!(scan("a\0b"), vec![
        (RawTag::Ident, 1),
        (RawTag::Unknown, 1),
        (RawTag::Ident, 1),
    ]);
}

#[test]
fn test_eof_is_sticky() {
    let buffer = SourceBuffer::new("x");
    let mut scanner = RawScanner::new(buffer.cursor());
    assert_eq!(scanner.next_token().tag, RawTag::Ident);
    for _ in 0..3 {
        assert_eq!(
            scanner.next_token(),
            RawToken {
                tag: RawTag::Eof,
                len: 0
            }
        );
    }
    assert_eq!(scanner.pos(), 1);
}

proptest! {
    #[test]
    fn prop_lengths_cover_source(source in "\\PC{0,64}") {
        let total: u32 = scan(&source).iter().map(|&(_, len)| len).sum();
        prop_assert_eq!(total as usize, source.len());
    }

    #[test]
    fn prop_no_empty_tokens(source in "[ -~\\n\\t]{0,64}") {
        for (tag, len) in scan(&source) {
            prop_assert!(len > 0, "{:?} had zero length", tag);
        }
    }
}
