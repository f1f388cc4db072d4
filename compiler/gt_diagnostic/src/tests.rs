use super::*;
use gt_ir::{LineOffsetTable, Span, Token, TokenKind, Unit};
use pretty_assertions::assert_eq;

fn unit_with(source: &str, tokens: Vec<Token>) -> Unit {
    Unit {
        path: "main.g".into(),
        source: source.into(),
        lines: LineOffsetTable::build(source),
        tokens,
        ..Unit::default()
    }
}

#[test]
fn compile_error_renders_position_and_code() {
    let err = Error::Compile {
        kind: CompileErrorKind::NameCollision { name: "a".into() },
        pos: Position {
            path: "main.g".into(),
            line: 3,
            column: 7,
        },
    };
    assert_eq!(err.to_string(), "main.g:3:7: [E2005] name `a` is already used");
    assert_eq!(err.code(), ErrorCode::E2005);
}

#[test]
fn runtime_error_without_position() {
    let err = Error::runtime(RuntimeErrorKind::NoRun);
    assert_eq!(err.to_string(), "[E4002] unit has no run entry");
    assert!(err.position().is_none());
}

#[test]
fn thread_error_exposes_inner_kind() {
    let inner = Error::runtime(RuntimeErrorKind::DivisionByZero);
    let err = Error::Thread {
        thread: 2,
        source: Box::new(inner),
    };
    assert_eq!(err.runtime_kind(), Some(&RuntimeErrorKind::DivisionByZero));
    assert_eq!(err.code(), ErrorCode::E4003);
    assert_eq!(err.to_string(), "thread 2: [E4003] division by zero");
}

#[test]
fn position_of_token_uses_line_table() {
    let source = "run {\n  x\n}";
    let unit = unit_with(
        source,
        vec![
            Token::new(TokenKind::Run, Span::new(0, 3)),
            Token::new(TokenKind::LBrace, Span::new(4, 5)),
            Token::new(TokenKind::Ident("x".into()), Span::new(8, 9)),
        ],
    );
    let pos = Position::of_token(&unit, 2);
    assert_eq!((pos.line, pos.column), (2, 3));
}

#[test]
fn position_past_last_token_points_after_it() {
    let source = "run {";
    let unit = unit_with(
        source,
        vec![
            Token::new(TokenKind::Run, Span::new(0, 3)),
            Token::new(TokenKind::LBrace, Span::new(4, 5)),
        ],
    );
    let pos = Position::of_token(&unit, 2);
    assert_eq!((pos.line, pos.column), (1, 6));
}
