#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tern_diagnostic::{DiagnosticBag, ErrorCode};
use tern_ir::{Source, SourceId, Span, Token, TokenKind};

use super::tokenize;

fn lex(text: &str) -> (Vec<Token>, DiagnosticBag) {
    let mut bag = DiagnosticBag::new();
    let tokens = tokenize(SourceId(0), &Source::new("test.tn", text), &mut bag);
    (tokens, bag)
}

fn summary(tokens: &[Token]) -> Vec<(TokenKind, &str, Span)> {
    tokens
        .iter()
        .map(|t| (t.kind, t.value.as_str(), t.pos.span))
        .collect()
}

fn kinds(text: &str) -> Vec<TokenKind> {
    lex(text).0.iter().map(|t| t.kind).collect()
}

fn codes(bag: &DiagnosticBag) -> Vec<ErrorCode> {
    bag.iter().map(|d| d.code).collect()
}

#[test]
fn test_var_declaration_tokens() {
    let (tokens, bag) = lex("var x = 0 ");
    assert!(bag.is_empty());
    assert_eq!(
        summary(&tokens),
        vec![
            (TokenKind::KeyVar, "var", Span::new(0, 3)),
            (TokenKind::Identifier, "x", Span::new(4, 5)),
            (TokenKind::Equal, "=", Span::new(6, 7)),
            (TokenKind::ConstantDigit, "0", Span::new(8, 9)),
            (TokenKind::Eof, "<EOF>", Span::new(10, 11)),
        ]
    );
}

#[test]
fn test_unterminated_string_reports_once() {
    let (tokens, bag) = lex("\"abc");
    assert_eq!(codes(&bag), vec![ErrorCode::E0001]);
    assert_eq!(
        bag.diagnostics()[0].message,
        "constant string has not been correctly enclosed"
    );
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    assert_eq!(tokens[0].kind, TokenKind::ConstantString);
    assert_eq!(tokens[0].value, "abc");
}

#[test]
fn test_unterminated_string_resumes_next_line() {
    let (tokens, bag) = lex("\"abc\nx");
    assert_eq!(codes(&bag), vec![ErrorCode::E0001]);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert!(tokens[1].on_new_line);
}

#[test]
fn test_keywords_and_booleans() {
    assert_eq!(
        kinds("fn if elif else and or true false name"),
        vec![
            TokenKind::KeyFn,
            TokenKind::KeyIf,
            TokenKind::KeyElif,
            TokenKind::KeyElse,
            TokenKind::BooleanAnd,
            TokenKind::BooleanOr,
            TokenKind::ConstantBoolean,
            TokenKind::ConstantBoolean,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    let (tokens, bag) = lex("1_000 3.5 2f 1..2");
    assert!(bag.is_empty());
    assert_eq!(
        tokens
            .iter()
            .map(|t| (t.kind, t.value.as_str()))
            .collect::<Vec<_>>(),
        vec![
            (TokenKind::ConstantDigit, "1000"),
            (TokenKind::ConstantFloatDigit, "3.5"),
            (TokenKind::ConstantFloatDigit, "2"),
            (TokenKind::ConstantDigit, "1"),
            (TokenKind::RangeDots, ".."),
            (TokenKind::ConstantDigit, "2"),
            (TokenKind::Eof, "<EOF>"),
        ]
    );
}

#[test]
fn test_number_errors_still_produce_tokens() {
    let (tokens, bag) = lex("1.2.3 123456789012345678901");
    assert_eq!(codes(&bag), vec![ErrorCode::E0006, ErrorCode::E0004]);
    assert_eq!(tokens[0].kind, TokenKind::ConstantFloatDigit);
    assert_eq!(tokens[1].kind, TokenKind::ConstantDigit);

    let (_, bag) = lex("12345678901234567890");
    assert!(bag.is_empty());
}

#[test]
fn test_string_escapes() {
    let (tokens, bag) = lex(r#""a\tb\\" '\n'"#);
    assert!(bag.is_empty());
    assert_eq!(tokens[0].value, "a\tb\\");
    assert_eq!(tokens[1].kind, TokenKind::ConstantChar);
    assert_eq!(tokens[1].value, "\n");
}

#[test]
fn test_bad_escape() {
    let (tokens, bag) = lex(r#""a\qb""#);
    assert_eq!(codes(&bag), vec![ErrorCode::E0002]);
    assert_eq!(bag.diagnostics()[0].pos.unwrap().span, Span::new(2, 4));
    assert_eq!(tokens[0].value, "aqb");
}

#[test]
fn test_char_length_errors() {
    let (_, bag) = lex("''");
    assert_eq!(codes(&bag), vec![ErrorCode::E0003]);
    assert_eq!(
        bag.diagnostics()[0].message,
        "not enough characters in constant char"
    );

    let (_, bag) = lex("'ab'");
    assert_eq!(
        bag.diagnostics()[0].message,
        "too many characters in constant char"
    );

    let (_, bag) = lex("'a");
    assert_eq!(codes(&bag), vec![ErrorCode::E0001]);
}

#[test]
fn test_backticks() {
    let (tokens, bag) = lex("`new` `+` `[]=`");
    assert!(bag.is_empty());
    assert_eq!(
        tokens
            .iter()
            .map(|t| (t.kind, t.value.as_str()))
            .collect::<Vec<_>>(),
        vec![
            (TokenKind::Identifier, "new"),
            (TokenKind::Identifier, "+"),
            (TokenKind::Identifier, "[]="),
            (TokenKind::Eof, "<EOF>"),
        ]
    );

    let (_, bag) = lex("`` `a b`");
    assert_eq!(codes(&bag), vec![ErrorCode::E0005, ErrorCode::E0005]);
    assert_eq!(
        bag.diagnostics()[1].message,
        "invalid backtick sequence"
    );
}

#[test]
fn test_unknown_character() {
    let (tokens, bag) = lex("a @ b");
    assert_eq!(codes(&bag), vec![ErrorCode::E0007]);
    assert_eq!(tokens[1].kind, TokenKind::Bad);
    assert_eq!(tokens[1].value, "@");
}

#[test]
fn test_on_new_line_flags() {
    let (tokens, _) = lex("a // c\nb /* x */ c /*\n*/ d");
    let flags: Vec<(&str, bool)> = tokens
        .iter()
        .map(|t| (t.value.as_str(), t.on_new_line))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("a", false),
            ("b", true),
            ("c", false),
            ("d", true),
            ("<EOF>", false),
        ]
    );
}

#[test]
fn test_double_operators() {
    assert_eq!(
        kinds("a++ += -- -= *= /= <= >= == != && ||"),
        vec![
            TokenKind::Identifier,
            TokenKind::Increment,
            TokenKind::AddAssignment,
            TokenKind::Decrement,
            TokenKind::SubAssignment,
            TokenKind::MulAssignment,
            TokenKind::DivAssignment,
            TokenKind::BooleanLeq,
            TokenKind::BooleanGeq,
            TokenKind::BooleanEq,
            TokenKind::BooleanNeq,
            TokenKind::BooleanAnd,
            TokenKind::BooleanOr,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_empty_source() {
    let (tokens, bag) = lex("");
    assert!(bag.is_empty());
    assert_eq!(summary(&tokens), vec![(TokenKind::Eof, "<EOF>", Span::new(0, 1))]);
}

proptest! {
    #[test]
    fn prop_ends_with_single_eof(text in "\\PC{0,80}") {
        let (tokens, _) = lex(&text);
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        let last = tokens.last().unwrap();
        prop_assert_eq!(last.kind, TokenKind::Eof);
        prop_assert_eq!(last.pos.span.start as usize, text.len());
    }

    #[test]
    fn prop_plain_tokens_match_source(text in "([a-eg-z +*=(){}\\n-]|[0-9]{1,4} ){0,40}") {
        let (tokens, bag) = lex(&text);
        prop_assert!(bag.is_empty());
        for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
            let range = token.pos.span.to_range();
            prop_assert_eq!(&text[range], token.value.as_str());
        }
    }
}
