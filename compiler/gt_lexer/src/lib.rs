//! Lexer for Gentee using logos.
//!
//! Produces the flat token stream the parsing state machine consumes.
//! Newlines and `;` both become [`TokenKind::Line`]; comments and horizontal
//! whitespace are dropped. Identifiers keep their dots (`arr.int`, `s.Len`).

use gt_diagnostic::LexErrorKind;
use gt_ir::{Span, Token, TokenKind};
use logos::Logos;

/// Raw token from logos, before literal decoding.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Comment,

    #[regex(r"/\*([^*]|\*+[^*/])*\**")]
    OpenComment,

    #[token("\n")]
    #[token(";")]
    Line,

    // === Keywords ===
    #[token("run")]
    Run,
    #[token("func")]
    Func,
    #[token("fn")]
    Fn,
    #[token("const")]
    Const,
    #[token("import")]
    Import,
    #[token("pub")]
    Pub,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("go")]
    Go,
    #[token("optional")]
    Optional,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("...")]
    Ellipsis,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexInt,
    #[regex(r"0[oO][0-7_]+")]
    OctInt,
    #[regex(r"[0-9][0-9_]*")]
    Int,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,
    #[regex(r#""([^"\\]|\\.)*"#)]
    OpenStr,
    #[regex(r"`[^`]*`")]
    RawStr,
    #[regex(r"`[^`]*")]
    OpenRawStr,
    #[regex(r"'([^'\\]|\\.)'")]
    Char,
    #[token("'")]
    BadChar,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Ident,
}

/// A lexing failure and where it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexFailure {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize `source`. Stops at the first malformed token.
#[tracing::instrument(level = "trace", skip_all, fields(len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, LexFailure> {
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();
        let fail = |kind| LexFailure { kind, span };
        let raw = result.map_err(|()| fail(LexErrorKind::InvalidCharacter(slice.to_string())))?;
        let kind = convert(raw, slice).map_err(fail)?;
        tokens.push(Token::new(kind, span));
    }

    tracing::trace!(count = tokens.len(), "lexed");
    Ok(tokens)
}

fn convert(raw: RawToken, slice: &str) -> Result<TokenKind, LexErrorKind> {
    let kind = match raw {
        RawToken::Comment => return Err(LexErrorKind::InvalidCharacter(slice.to_string())),
        RawToken::OpenComment => return Err(LexErrorKind::UnterminatedComment),
        RawToken::OpenStr | RawToken::OpenRawStr => {
            return Err(LexErrorKind::UnterminatedString)
        }
        RawToken::BadChar => return Err(LexErrorKind::InvalidChar),

        RawToken::Int => TokenKind::Int(parse_int(slice, 10)?),
        RawToken::HexInt => TokenKind::Int(parse_int(&slice[2..], 16)?),
        RawToken::OctInt => TokenKind::Int(parse_int(&slice[2..], 8)?),
        RawToken::Float => TokenKind::Float(
            slice
                .replace('_', "")
                .parse::<f64>()
                .map_err(|_| LexErrorKind::InvalidNumber(slice.to_string()))?,
        ),
        RawToken::Str => TokenKind::Str(unescape(&slice[1..slice.len() - 1])?),
        RawToken::RawStr => TokenKind::Str(slice[1..slice.len() - 1].to_string()),
        RawToken::Char => {
            let text = unescape(&slice[1..slice.len() - 1])?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => TokenKind::Char(c),
                _ => return Err(LexErrorKind::InvalidChar),
            }
        }
        RawToken::Ident => TokenKind::Ident(slice.to_string()),

        RawToken::Line => TokenKind::Line,
        RawToken::Run => TokenKind::Run,
        RawToken::Func => TokenKind::Func,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Const => TokenKind::Const,
        RawToken::Import => TokenKind::Import,
        RawToken::Pub => TokenKind::Pub,
        RawToken::If => TokenKind::If,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Case => TokenKind::Case,
        RawToken::Default => TokenKind::Default,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Go => TokenKind::Go,
        RawToken::Optional => TokenKind::Optional,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Question => TokenKind::Question,
        RawToken::Dot => TokenKind::Dot,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::Ellipsis => TokenKind::Ellipsis,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::Bang => TokenKind::Bang,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Assign => TokenKind::Assign,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::ShlEq => TokenKind::ShlEq,
        RawToken::ShrEq => TokenKind::ShrEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
    };
    Ok(kind)
}

fn parse_int(digits: &str, radix: u32) -> Result<i64, LexErrorKind> {
    let clean = digits.replace('_', "");
    i64::from_str_radix(&clean, radix).map_err(|_| LexErrorKind::InvalidNumber(digits.to_string()))
}

/// Decode backslash escapes of a quoted literal body.
fn unescape(body: &str) -> Result<String, LexErrorKind> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(LexErrorKind::InvalidEscape(other)),
            None => return Err(LexErrorKind::InvalidEscape(' ')),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests;
