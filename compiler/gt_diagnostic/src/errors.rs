//! Error taxonomy.
//!
//! Every phase reports through one [`Error`] enum. The kind enums carry the
//! structured data; [`Error`] adds the phase and, when known, the
//! `path:line:column` position.

use crate::ErrorCode;
use gt_ir::Unit;
use std::fmt;

/// Source position of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position of token `index` of `unit`. An index past the last token
    /// points just after the last token.
    pub fn of_token(unit: &Unit, index: u32) -> Self {
        let (line, column) = match unit.tokens.len() {
            len if (index as usize) < len => unit.line_col(index),
            0 => (1, 1),
            len => {
                let last = &unit.tokens[len - 1];
                unit.lines.offset_to_line_col(&unit.source, last.span.end)
            }
        };
        Position {
            path: unit.path.clone(),
            line,
            column,
        }
    }

    /// Position of a byte offset in `source`.
    pub fn of_offset(path: &str, source: &str, offset: u32) -> Self {
        let table = gt_ir::LineOffsetTable::build(source);
        let (line, column) = table.offset_to_line_col(source, offset);
        Position {
            path: path.to_string(),
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

fn located(pos: &Option<Position>) -> String {
    pos.as_ref().map(|p| format!("{p}: ")).unwrap_or_default()
}

/// Top-level error.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("{pos}: [{}] {kind}", .kind.code())]
    Lex { kind: LexErrorKind, pos: Position },

    #[error("{pos}: [{}] {kind}", .kind.code())]
    Compile { kind: CompileErrorKind, pos: Position },

    #[error("{}[{}] {kind}", located(.pos), .kind.code())]
    Link {
        kind: LinkErrorKind,
        pos: Option<Position>,
    },

    #[error("{}[{}] {kind}", located(.pos), .kind.code())]
    Runtime {
        kind: RuntimeErrorKind,
        pos: Option<Position>,
    },

    /// A runtime error raised inside a spawned thread.
    #[error("thread {thread}: {source}")]
    Thread { thread: usize, source: Box<Error> },
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Lex { kind, .. } => kind.code(),
            Error::Compile { kind, .. } => kind.code(),
            Error::Link { kind, .. } => kind.code(),
            Error::Runtime { kind, .. } => kind.code(),
            Error::Thread { source, .. } => source.code(),
        }
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            Error::Lex { pos, .. } | Error::Compile { pos, .. } => Some(pos),
            Error::Link { pos, .. } | Error::Runtime { pos, .. } => pos.as_ref(),
            Error::Thread { source, .. } => source.position(),
        }
    }

    pub fn runtime(kind: RuntimeErrorKind) -> Self {
        Error::Runtime { kind, pos: None }
    }

    pub fn link(kind: LinkErrorKind) -> Self {
        Error::Link { kind, pos: None }
    }

    pub fn compile_kind(&self) -> Option<&CompileErrorKind> {
        match self {
            Error::Compile { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Runtime kind, looking through thread wrappers.
    pub fn runtime_kind(&self) -> Option<&RuntimeErrorKind> {
        match self {
            Error::Runtime { kind, .. } => Some(kind),
            Error::Thread { source, .. } => source.runtime_kind(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character `{0}`")]
    InvalidCharacter(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid character literal")]
    InvalidChar,
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("invalid escape sequence `\\{0}`")]
    InvalidEscape(char),
    #[error("unterminated block comment")]
    UnterminatedComment,
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::InvalidCharacter(_) => ErrorCode::E0001,
            LexErrorKind::UnterminatedString => ErrorCode::E0002,
            LexErrorKind::InvalidChar => ErrorCode::E0003,
            LexErrorKind::InvalidNumber(_) => ErrorCode::E0004,
            LexErrorKind::InvalidEscape(_) => ErrorCode::E0005,
            LexErrorKind::UnterminatedComment => ErrorCode::E0006,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileErrorKind {
    #[error("source is empty")]
    EmptySource,
    #[error("unexpected `{found}`")]
    UnexpectedToken { found: String },
    #[error("unexpected end of source")]
    UnexpectedEnd,
    #[error("second `:` on the same line")]
    DoubleColon,
    #[error("unclosed `{delimiter}`")]
    UnclosedDelimiter { delimiter: String },
    #[error("expected expression, found `{found}`")]
    ExpectedExpression { found: String },
    #[error("`run` is already declared")]
    DuplicateRun,
    #[error("`optional` is allowed only on a function's trailing parameters")]
    IllegalOptional,
    #[error("identifier `{name}` may not contain `.`")]
    QualifiedIdent { name: String },
    #[error("identifier `{name}` may not start with a capital letter")]
    CapitalIdent { name: String },
    #[error("`break` outside a loop")]
    BreakOutsideLoop,
    #[error("`continue` outside a loop")]
    ContinueOutsideLoop,
    #[error("variadic parameter must be the last one")]
    VariadicNotLast,
    #[error("constant `{name}` must be upper-case")]
    ConstCase { name: String },
    #[error("`{keyword}` without a preceding `if`")]
    ElseWithoutIf { keyword: String },
    #[error("unknown type `{name}`")]
    UnknownType { name: String },
    #[error("unknown identifier `{name}`")]
    UnknownIdent { name: String },
    #[error("function {name}({args}) is not found")]
    UnknownFunction { name: String, args: String },
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: String, found: String },
    #[error("name `{name}` is already used")]
    NameCollision { name: String },
    #[error("left side of assignment is not assignable")]
    NotAssignable,
    #[error("{message}")]
    InvalidReturn { message: String },
}

impl CompileErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileErrorKind::EmptySource => ErrorCode::E1000,
            CompileErrorKind::UnexpectedToken { .. } => ErrorCode::E1001,
            CompileErrorKind::UnexpectedEnd => ErrorCode::E1002,
            CompileErrorKind::DoubleColon => ErrorCode::E1003,
            CompileErrorKind::UnclosedDelimiter { .. } => ErrorCode::E1004,
            CompileErrorKind::ExpectedExpression { .. } => ErrorCode::E1005,
            CompileErrorKind::DuplicateRun => ErrorCode::E1006,
            CompileErrorKind::IllegalOptional => ErrorCode::E1007,
            CompileErrorKind::QualifiedIdent { .. } => ErrorCode::E1008,
            CompileErrorKind::CapitalIdent { .. } => ErrorCode::E1009,
            CompileErrorKind::BreakOutsideLoop => ErrorCode::E1010,
            CompileErrorKind::ContinueOutsideLoop => ErrorCode::E1011,
            CompileErrorKind::VariadicNotLast => ErrorCode::E1012,
            CompileErrorKind::ConstCase { .. } => ErrorCode::E1013,
            CompileErrorKind::ElseWithoutIf { .. } => ErrorCode::E1014,
            CompileErrorKind::UnknownType { .. } => ErrorCode::E2001,
            CompileErrorKind::UnknownIdent { .. } => ErrorCode::E2002,
            CompileErrorKind::UnknownFunction { .. } => ErrorCode::E2003,
            CompileErrorKind::TypeMismatch { .. } => ErrorCode::E2004,
            CompileErrorKind::NameCollision { .. } => ErrorCode::E2005,
            CompileErrorKind::NotAssignable => ErrorCode::E2006,
            CompileErrorKind::InvalidReturn { .. } => ErrorCode::E2007,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkErrorKind {
    #[error("unit `{name}` is not compiled")]
    UnknownUnit { name: String },
    #[error("workspace has no standard library")]
    MissingStdlib,
}

impl LinkErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LinkErrorKind::UnknownUnit { .. } => ErrorCode::E3001,
            LinkErrorKind::MissingStdlib => ErrorCode::E3002,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeErrorKind {
    #[error("unit index {index} is out of range")]
    RunIndex { index: usize },
    #[error("unit has no run entry")]
    NoRun,
    #[error("division by zero")]
    DivisionByZero,
    #[error("negative shift amount {amount}")]
    NegativeShift { amount: i64 },
    #[error("index {index} is out of range")]
    IndexOutOfRange { index: i64 },
    #[error("key `{key}` is not found")]
    KeyNotFound { key: String },
    #[error("{message}")]
    Custom { message: String },
    #[error("operation is not supported on {os}")]
    UnsupportedPlatform { os: String },
    #[error("maximum call depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },
    #[error("thread was closed")]
    Interrupted,
    #[error("cannot convert `{value}` to {target}")]
    InvalidConversion { value: String, target: String },
    #[error("{message}")]
    Io { message: String },
    #[error("function value is not assigned")]
    NullFunction,
}

impl RuntimeErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            RuntimeErrorKind::RunIndex { .. } => ErrorCode::E4001,
            RuntimeErrorKind::NoRun => ErrorCode::E4002,
            RuntimeErrorKind::DivisionByZero => ErrorCode::E4003,
            RuntimeErrorKind::NegativeShift { .. } => ErrorCode::E4004,
            RuntimeErrorKind::IndexOutOfRange { .. } | RuntimeErrorKind::KeyNotFound { .. } => {
                ErrorCode::E4005
            }
            RuntimeErrorKind::Custom { .. } => ErrorCode::E4006,
            RuntimeErrorKind::UnsupportedPlatform { .. } => ErrorCode::E4007,
            RuntimeErrorKind::StackOverflow { .. } => ErrorCode::E4008,
            RuntimeErrorKind::Interrupted => ErrorCode::E4009,
            RuntimeErrorKind::InvalidConversion { .. } => ErrorCode::E4010,
            RuntimeErrorKind::Io { .. } => ErrorCode::E4011,
            RuntimeErrorKind::NullFunction => ErrorCode::E4012,
        }
    }
}
