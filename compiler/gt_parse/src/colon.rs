//! Colon sugar: `if x: stmt` is `if x { stmt }`.

use gt_ir::{Span, Token, TokenKind};

/// Rewrite every `:` to `{` and close it before the next newline.
///
/// A `;` does not close the block, so `case 1: a(); b()` puts both calls in
/// it. Returns the byte offset of a second colon opened before the first one
/// closed.
pub(crate) fn expand(tokens: &mut Vec<Token>, source: &str) -> Result<(), u32> {
    if !tokens.iter().any(|t| t.kind == TokenKind::Colon) {
        return Ok(());
    }
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(tokens.len() + 4);
    let mut open = false;
    for token in std::mem::take(tokens) {
        match token.kind {
            TokenKind::Colon => {
                if open {
                    return Err(token.span.start);
                }
                open = true;
                out.push(Token::new(TokenKind::LBrace, token.span));
            }
            TokenKind::Line if open && bytes.get(token.span.start as usize) == Some(&b'\n') => {
                out.push(Token::new(TokenKind::RBrace, Span::point(token.span.start)));
                open = false;
                out.push(token);
            }
            _ => out.push(token),
        }
    }
    if open {
        let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
        out.push(Token::new(TokenKind::RBrace, Span::point(end)));
    }
    *tokens = out;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Result<Vec<TokenKind>, u32> {
        let mut tokens = gt_lexer::lex(source).unwrap();
        expand(&mut tokens, source)?;
        Ok(tokens.into_iter().map(|t| t.kind).collect())
    }

    #[test]
    fn colon_closes_at_newline() {
        let got = kinds("if a: b()\nc").unwrap();
        assert_eq!(
            got,
            vec![
                TokenKind::If,
                TokenKind::Ident("a".into()),
                TokenKind::LBrace,
                TokenKind::Ident("b".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::RBrace,
                TokenKind::Line,
                TokenKind::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn semicolon_stays_inside_and_end_of_input_closes() {
        let got = kinds("else: a; b").unwrap();
        assert_eq!(got.first(), Some(&TokenKind::Else));
        assert_eq!(got.last(), Some(&TokenKind::RBrace));
        assert_eq!(got.iter().filter(|k| **k == TokenKind::RBrace).count(), 1);
    }

    #[test]
    fn second_colon_on_one_line_is_rejected() {
        assert_eq!(kinds("if a: if b: c"), Err(10));
    }
}
