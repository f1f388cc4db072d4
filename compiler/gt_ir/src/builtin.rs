//! Native functions of the standard library.
//!
//! The standard library registers one embedded object per overload; several
//! overloads may share a `Builtin` and the runtime dispatches on the values.

/// Identifier of a natively implemented function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    // Operators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Equal,
    Less,
    Greater,
    Not,
    Sign,
    BitNot,
    Len,
    NewRange,

    // Conversions
    ToInt,
    ToFloat,
    ToStr,
    ToBool,
    ToChar,

    // Containers
    IsKey,

    // Console and control
    Print,
    Println,
    Error,
    Sleep,
    Wait,

    // Command line
    Args,
    ArgCount,
    Arg,
    ArgOr,
    ArgInt,
    ArgsOf,
    ArgsTail,
    IsArg,

    // Process
    Open,
    OpenWith,

    // Paths
    AbsPath,
    BaseName,
    Dir,
    Ext,
    JoinPath,
    MatchPath,
}
