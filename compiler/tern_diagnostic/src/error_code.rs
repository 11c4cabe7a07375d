//! Error codes for every diagnostic the compiler emits.
//!
//! Codes are grouped by stage:
//! - `E0xxx` lexer
//! - `E1xxx` / `W1xxx` parser
//! - `E2xxx` / `W2xxx` IR generation
//! - `E9xxx` internal

use std::fmt;

/// Error codes for all compiler diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    // Lexical errors (E0xxx)
    /// Unterminated string, char or backtick literal
    E0001,
    /// Unknown escape sequence
    E0002,
    /// Char literal with zero or more than one character
    E0003,
    /// Numeric constant too long
    E0004,
    /// Empty or invalid backtick sequence
    E0005,
    /// Second `.` inside a numeric constant
    E0006,
    /// Character the lexer cannot classify
    E0007,

    // Syntax errors (E1xxx)
    /// Expected a specific token
    E1001,
    /// Unexpected end of file inside a construct
    E1002,
    /// Token that begins no top-level member
    E1003,
    /// Parameter type cannot be inferred from a later parameter
    E1004,
    /// Pragmas attached to a member that takes none
    E1005,
    /// Modifier attached to a member that takes none
    E1006,
    /// Error-union type outside a function return type
    E1007,
    /// Expected an expression
    E1008,

    // Syntax warnings (W1xxx)
    /// Two statements share a line
    W1001,

    // Semantic errors (E2xxx)
    /// Value-producing expression that is not the last of its block
    E2001,
    /// Type mismatch
    E2002,
    /// `if` used as a value without an `else`
    E2003,
    /// Prefix operator applied to an unsupported operand
    E2004,
    /// Void expression where a value is required
    E2005,
    /// Assignment target is neither a local nor a field
    E2006,
    /// Assignment to a constant
    E2007,
    /// Constant declared without a value
    E2008,
    /// Declaration with neither a type nor a value
    E2009,
    /// Name declared twice in the same scope
    E2010,
    /// Duplicate field or enum member
    E2011,
    /// Struct contains itself without indirection
    E2012,
    /// Enum member value does not fit the enum base
    E2013,
    /// Division by constant zero
    E2014,
    /// Negative constant in an unsigned context
    E2015,
    /// `new` on a type that is not a struct
    E2016,
    /// Field initialized twice
    E2017,
    /// Unknown field
    E2018,
    /// Private field accessed outside its struct
    E2019,
    /// Missing entry point
    E2020,
    /// Entry point with the wrong shape
    E2021,
    /// Field that must be initialized explicitly
    E2022,
    /// Member access on a value that is not a struct
    E2023,
    /// Call to an undeclared function
    E2024,
    /// Call to the entry point
    E2025,
    /// No overload accepts the argument types
    E2026,
    /// Wrong number of generic arguments
    E2027,
    /// Invalid cast
    E2028,
    /// Private method called outside its struct
    E2029,
    /// Wrong number of arguments to a built-in function
    E2030,
    /// Size of a type cannot be computed
    E2031,
    /// Undeclared identifier
    E2032,
    /// Undeclared type
    E2033,
    /// `break` or `continue` outside a loop
    E2034,
    /// Operator applied to operands it does not support
    E2035,

    // Semantic warnings (W2xxx)
    /// Cast to the type the value already has
    W2001,
    /// Constant boolean inside a boolean expression
    W2002,
    /// Result of a built-in call is discarded
    W2003,

    // Internal errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Construct the backend cannot lower yet
    E9002,
}

impl ErrorCode {
    /// Every code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E0007,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::W1001,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E2012,
        ErrorCode::E2013,
        ErrorCode::E2014,
        ErrorCode::E2015,
        ErrorCode::E2016,
        ErrorCode::E2017,
        ErrorCode::E2018,
        ErrorCode::E2019,
        ErrorCode::E2020,
        ErrorCode::E2021,
        ErrorCode::E2022,
        ErrorCode::E2023,
        ErrorCode::E2024,
        ErrorCode::E2025,
        ErrorCode::E2026,
        ErrorCode::E2027,
        ErrorCode::E2028,
        ErrorCode::E2029,
        ErrorCode::E2030,
        ErrorCode::E2031,
        ErrorCode::E2032,
        ErrorCode::E2033,
        ErrorCode::E2034,
        ErrorCode::E2035,
        ErrorCode::W2001,
        ErrorCode::W2002,
        ErrorCode::W2003,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::W1001 => "W1001",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2020 => "E2020",
            ErrorCode::E2021 => "E2021",
            ErrorCode::E2022 => "E2022",
            ErrorCode::E2023 => "E2023",
            ErrorCode::E2024 => "E2024",
            ErrorCode::E2025 => "E2025",
            ErrorCode::E2026 => "E2026",
            ErrorCode::E2027 => "E2027",
            ErrorCode::E2028 => "E2028",
            ErrorCode::E2029 => "E2029",
            ErrorCode::E2030 => "E2030",
            ErrorCode::E2031 => "E2031",
            ErrorCode::E2032 => "E2032",
            ErrorCode::E2033 => "E2033",
            ErrorCode::E2034 => "E2034",
            ErrorCode::E2035 => "E2035",
            ErrorCode::W2001 => "W2001",
            ErrorCode::W2002 => "W2002",
            ErrorCode::W2003 => "W2003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Warning codes start with `W`; everything else is an error.
    pub fn is_warning(self) -> bool {
        self.as_str().starts_with('W')
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let mut names: Vec<&str> = ErrorCode::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn test_warning_classification() {
        assert!(ErrorCode::W1001.is_warning());
        assert!(ErrorCode::W2003.is_warning());
        assert!(!ErrorCode::E2002.is_warning());
        assert_eq!(ErrorCode::E0007.to_string(), "E0007");
    }
}
