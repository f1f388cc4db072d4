//! Token listings.

use gentee::{token_listing, Error, LexErrorKind};
use pretty_assertions::assert_eq;

#[test]
fn listing_positions_every_token() {
    let listing = token_listing("run {\n  a = 1\n}", "main.g").unwrap();
    assert_eq!(
        listing,
        vec![
            "1:1 Run",
            "1:5 LBrace",
            "1:6 Line",
            "2:3 Ident(\"a\")",
            "2:5 Assign",
            "2:7 Int(1)",
            "2:8 Line",
            "3:1 RBrace",
        ]
    );
}

#[test]
fn lexical_failure_is_positioned() {
    let err = token_listing("run {\n  a # b\n}", "main.g").unwrap_err();
    let Error::Lex { kind, pos } = &err else {
        panic!("expected a lexical error, got {err}");
    };
    assert_eq!(kind, &LexErrorKind::InvalidCharacter("#".into()));
    assert_eq!((pos.line, pos.column), (2, 5));
    assert_eq!(err.to_string(), "main.g:2:5: [E0001] unexpected character `#`");
}
