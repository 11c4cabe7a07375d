//! Operator matching for the binary tiers and prefix forms.
//!
//! Infix operators only match on the line of the previous token; a line
//! break before one ends the expression.

use tern_ir::ast::{AssignOp, BinaryOp, BooleanOp, PrefixOp};
use tern_ir::TokenKind;

use crate::Parser;

impl Parser<'_> {
    fn infix_kind(&self) -> Option<TokenKind> {
        let token = self.cursor.current();
        (!token.on_new_line).then_some(token.kind)
    }

    pub(super) fn match_assign_op(&self) -> Option<AssignOp> {
        match self.infix_kind()? {
            TokenKind::Equal => Some(AssignOp::Assign),
            TokenKind::AddAssignment => Some(AssignOp::Add),
            TokenKind::SubAssignment => Some(AssignOp::Sub),
            TokenKind::MulAssignment => Some(AssignOp::Mul),
            TokenKind::DivAssignment => Some(AssignOp::Div),
            _ => None,
        }
    }

    pub(super) fn match_logical_op(&self) -> Option<BooleanOp> {
        match self.infix_kind()? {
            TokenKind::BooleanAnd => Some(BooleanOp::And),
            TokenKind::BooleanOr => Some(BooleanOp::Or),
            _ => None,
        }
    }

    pub(super) fn match_relational_op(&self) -> Option<BooleanOp> {
        match self.infix_kind()? {
            TokenKind::BooleanEq => Some(BooleanOp::Eq),
            TokenKind::BooleanNeq => Some(BooleanOp::Neq),
            TokenKind::BooleanLess => Some(BooleanOp::Less),
            TokenKind::BooleanGreater => Some(BooleanOp::Greater),
            TokenKind::BooleanLeq => Some(BooleanOp::Leq),
            TokenKind::BooleanGeq => Some(BooleanOp::Geq),
            TokenKind::KeyIn => Some(BooleanOp::In),
            _ => None,
        }
    }

    pub(super) fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.infix_kind()? {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    pub(super) fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.infix_kind()? {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::RangeDots => Some(BinaryOp::Range),
            _ => None,
        }
    }

    /// Prefix operators may start a line.
    pub(super) fn match_prefix_op(&self) -> Option<PrefixOp> {
        match self.cursor.current_kind() {
            TokenKind::Minus => Some(PrefixOp::Neg),
            TokenKind::Plus => Some(PrefixOp::Plus),
            TokenKind::Negation => Some(PrefixOp::Not),
            TokenKind::Ampersand => Some(PrefixOp::AddressOf),
            TokenKind::Star => Some(PrefixOp::Deref),
            TokenKind::Increment => Some(PrefixOp::Increment),
            TokenKind::Decrement => Some(PrefixOp::Decrement),
            _ => None,
        }
    }
}
