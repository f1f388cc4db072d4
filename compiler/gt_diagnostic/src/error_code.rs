use std::fmt;

/// Error codes for every compile and runtime failure.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Type and name errors
/// - E3xxx: Link errors
/// - E4xxx: Runtime errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Character that starts no token
    E0001,
    /// Unterminated string or raw string
    E0002,
    /// Invalid or unterminated character literal
    E0003,
    /// Invalid number literal
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Unterminated block comment
    E0006,

    // Parser Errors (E1xxx)
    /// Source contains no tokens
    E1000,
    /// Unexpected token
    E1001,
    /// Unexpected end of input
    E1002,
    /// Second `:` before the first implicit block closed
    E1003,
    /// Unclosed delimiter in expression
    E1004,
    /// Expected expression
    E1005,
    /// `run` declared twice
    E1006,
    /// `optional` outside a function's trailing parameters
    E1007,
    /// Identifier contains a dot
    E1008,
    /// Identifier starts with an upper-case letter
    E1009,
    /// `break` outside a loop or case
    E1010,
    /// `continue` outside a loop
    E1011,
    /// Parameter after a variadic parameter
    E1012,
    /// Constant name is not upper-case
    E1013,
    /// `elif`/`else` without a preceding `if`
    E1014,

    // Type Errors (E2xxx)
    /// Unknown type name
    E2001,
    /// Unknown identifier
    E2002,
    /// No function overload accepts the arguments
    E2003,
    /// Type mismatch
    E2004,
    /// Name already in use
    E2005,
    /// Assignment target is not a variable or element
    E2006,
    /// Return value does not fit the function
    E2007,

    // Link Errors (E3xxx)
    /// Imported unit is not registered
    E3001,
    /// Workspace has no standard library
    E3002,

    // Runtime Errors (E4xxx)
    /// Unit index out of range
    E4001,
    /// Unit has no `run` entry
    E4002,
    /// Division or modulo by zero
    E4003,
    /// Negative shift amount
    E4004,
    /// Index out of range or missing key
    E4005,
    /// Error raised by the program
    E4006,
    /// Operation unsupported on this platform
    E4007,
    /// Call depth limit exceeded
    E4008,
    /// Thread was signaled to close
    E4009,
    /// Value conversion failed
    E4010,
    /// Host I/O failure
    E4011,
    /// Call through an unassigned function value
    E4012,
}

impl ErrorCode {
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            // Parser
            ErrorCode::E1000 => "E1000",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E1013 => "E1013",
            ErrorCode::E1014 => "E1014",
            // Types
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            // Link
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            // Runtime
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E4007 => "E4007",
            ErrorCode::E4008 => "E4008",
            ErrorCode::E4009 => "E4009",
            ErrorCode::E4010 => "E4010",
            ErrorCode::E4011 => "E4011",
            ErrorCode::E4012 => "E4012",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
