//! Compile-time constant values.

use std::fmt;

use tern_ir::ast::{Literal, LiteralKind};

/// A value known at compile time: a folded expression, an enum member
/// or a global constant.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Int(i128),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl Constant {
    /// Interpret a cooked literal. `None` if an integer does not fit in
    /// 128 bits or a char literal is empty.
    pub fn from_literal(literal: &Literal) -> Option<Constant> {
        let value = &literal.value;
        match literal.kind {
            LiteralKind::Int => value.parse().ok().map(Constant::Int),
            LiteralKind::Float => value.parse().ok().map(Constant::Float),
            LiteralKind::Bool => Some(Constant::Bool(value == "true")),
            LiteralKind::Char => value.chars().next().map(Constant::Char),
            LiteralKind::Str => Some(Constant::Str(value.clone())),
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match *self {
            Constant::Int(value) => Some(value),
            Constant::Char(c) => Some(i128::from(u32::from(c))),
            Constant::Bool(b) => Some(i128::from(b)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Constant::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(value) => write!(f, "{value}"),
            Constant::Float(value) => write!(f, "{value}"),
            Constant::Bool(value) => write!(f, "{value}"),
            Constant::Char(value) => write!(f, "{value:?}"),
            Constant::Str(value) => write!(f, "{value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_literal() {
        let int = Literal::new(LiteralKind::Int, "-12");
        assert_eq!(Constant::from_literal(&int), Some(Constant::Int(-12)));
        let chr = Literal::new(LiteralKind::Char, "a");
        assert_eq!(Constant::from_literal(&chr), Some(Constant::Char('a')));
        assert_eq!(
            Constant::from_literal(&Literal::boolean(true)),
            Some(Constant::Bool(true))
        );
        let huge = Literal::new(LiteralKind::Int, "9".repeat(60));
        assert_eq!(Constant::from_literal(&huge), None);
    }

    #[test]
    fn test_as_int_widens_char_and_bool() {
        assert_eq!(Constant::Char('A').as_int(), Some(65));
        assert_eq!(Constant::Bool(true).as_int(), Some(1));
        assert_eq!(Constant::Str(String::new()).as_int(), None);
    }
}
