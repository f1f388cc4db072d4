#![allow(clippy::unwrap_used)]

use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn lexes_run_block() {
    assert_eq!(
        kinds("run {\n  print(1 + 2)\n}"),
        vec![
            TokenKind::Run,
            TokenKind::LBrace,
            TokenKind::Line,
            TokenKind::Ident("print".into()),
            TokenKind::LParen,
            TokenKind::Int(1),
            TokenKind::Plus,
            TokenKind::Int(2),
            TokenKind::RParen,
            TokenKind::Line,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn semicolon_is_a_line() {
    assert_eq!(
        kinds("a;b"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Line,
            TokenKind::Ident("b".into()),
        ]
    );
}

#[test]
fn dotted_identifiers_stay_whole() {
    assert_eq!(
        kinds("arr.int x"),
        vec![
            TokenKind::Ident("arr.int".into()),
            TokenKind::Ident("x".into()),
        ]
    );
}

#[test]
fn range_between_numbers() {
    assert_eq!(
        kinds("1..5 2.5"),
        vec![
            TokenKind::Int(1),
            TokenKind::DotDot,
            TokenKind::Int(5),
            TokenKind::Float(2.5),
        ]
    );
}

#[test]
fn number_bases() {
    assert_eq!(
        kinds("0xff 0o17 1_000"),
        vec![TokenKind::Int(255), TokenKind::Int(15), TokenKind::Int(1000)]
    );
}

#[test]
fn string_escapes_and_raw_strings() {
    assert_eq!(
        kinds(r#""a\tb\n" `c\d`"#),
        vec![
            TokenKind::Str("a\tb\n".into()),
            TokenKind::Str("c\\d".into()),
        ]
    );
}

#[test]
fn char_literals() {
    assert_eq!(
        kinds(r"'x' '\n'"),
        vec![TokenKind::Char('x'), TokenKind::Char('\n')]
    );
}

#[test]
fn comments_are_dropped() {
    assert_eq!(
        kinds("a // note\n/* block\n comment */ b"),
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Line,
            TokenKind::Ident("b".into()),
        ]
    );
}

#[test]
fn keywords_win_over_identifiers_only_when_whole() {
    assert_eq!(
        kinds("run runner go"),
        vec![
            TokenKind::Run,
            TokenKind::Ident("runner".into()),
            TokenKind::Go,
        ]
    );
}

#[test]
fn compound_operators() {
    assert_eq!(
        kinds("<<= != ++ ... &&"),
        vec![
            TokenKind::ShlEq,
            TokenKind::NotEq,
            TokenKind::PlusPlus,
            TokenKind::Ellipsis,
            TokenKind::AndAnd,
        ]
    );
}

#[test]
fn unterminated_string_fails_at_quote() {
    let err = lex("x = \"abc").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.span.start, 4);
}

#[test]
fn invalid_escape_fails() {
    let err = lex(r#""\q""#).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::InvalidEscape('q'));
}

#[test]
fn stray_character_fails() {
    let err = lex("a # b").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::InvalidCharacter("#".into()));
    assert_eq!(err.span.start, 2);
}

#[test]
fn unterminated_comment_fails() {
    let err = lex("a /* b").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
}

#[test]
fn integer_overflow_is_invalid_number() {
    let err = lex("99999999999999999999").unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::InvalidNumber(_)));
}
