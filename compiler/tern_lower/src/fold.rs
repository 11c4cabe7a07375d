//! Constant folding.
//!
//! [`Lowerer::fold`] evaluates literals, prefix `-`/`+`/`!`, arithmetic,
//! comparisons and global constants without emitting anything. Whether a
//! folded value fits is decided when it is typed against the context, in
//! [`Lowerer::constant_type`].

use std::cmp::Ordering;

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{BinaryOp, BooleanOp, Expr, ExprKind, PrefixOp};
use tern_ir::Pos;
use tern_mir::{Instruction, InstructionKind, Operand};
use tern_types::{Constant, FloatWidth, Symbol, Type, TypeKind};

use crate::lowerer::Lowerer;

/// Why an expression has no compile-time value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FoldError {
    /// A constant division by zero at this position.
    DivisionByZero(Pos),
    NotConstant,
}

pub(crate) fn fold_binary(op: BinaryOp, left: &Constant, right: &Constant) -> Option<Constant> {
    match (left, right) {
        (Constant::Int(l), Constant::Int(r)) => {
            let value = match op {
                BinaryOp::Add => l.checked_add(*r),
                BinaryOp::Sub => l.checked_sub(*r),
                BinaryOp::Mul => l.checked_mul(*r),
                BinaryOp::Div => l.checked_div(*r),
                BinaryOp::Range => None,
            };
            value.map(Constant::Int)
        }
        (Constant::Float(l), Constant::Float(r)) => {
            let value = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div if *r != 0.0 => l / r,
                BinaryOp::Div | BinaryOp::Range => return None,
            };
            Some(Constant::Float(value))
        }
        _ => None,
    }
}

pub(crate) fn fold_boolean(op: BooleanOp, left: &Constant, right: &Constant) -> Option<Constant> {
    let ordering = match (left, right) {
        (Constant::Bool(l), Constant::Bool(r)) => {
            let value = match op {
                BooleanOp::And => *l && *r,
                BooleanOp::Or => *l || *r,
                BooleanOp::Eq => l == r,
                BooleanOp::Neq => l != r,
                _ => return None,
            };
            return Some(Constant::Bool(value));
        }
        (Constant::Int(l), Constant::Int(r)) => l.cmp(r),
        (Constant::Float(l), Constant::Float(r)) => l.partial_cmp(r)?,
        (Constant::Char(l), Constant::Char(r)) => l.cmp(r),
        (Constant::Str(l), Constant::Str(r)) => l.cmp(r),
        _ => return None,
    };
    let value = match op {
        BooleanOp::Eq => ordering == Ordering::Equal,
        BooleanOp::Neq => ordering != Ordering::Equal,
        BooleanOp::Less => ordering == Ordering::Less,
        BooleanOp::Greater => ordering == Ordering::Greater,
        BooleanOp::Leq => ordering != Ordering::Greater,
        BooleanOp::Geq => ordering != Ordering::Less,
        BooleanOp::In | BooleanOp::And | BooleanOp::Or => return None,
    };
    Some(Constant::Bool(value))
}

pub(crate) fn fold_prefix(op: PrefixOp, value: &Constant) -> Option<Constant> {
    match (op, value) {
        (PrefixOp::Neg, Constant::Int(v)) => v.checked_neg().map(Constant::Int),
        (PrefixOp::Neg, Constant::Float(v)) => Some(Constant::Float(-v)),
        (PrefixOp::Plus, Constant::Int(_) | Constant::Float(_)) => Some(value.clone()),
        (PrefixOp::Not, Constant::Bool(b)) => Some(Constant::Bool(!b)),
        _ => None,
    }
}

pub(crate) fn is_zero(value: &Constant) -> bool {
    match value {
        Constant::Int(v) => *v == 0,
        Constant::Float(v) => *v == 0.0,
        _ => false,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "u64 constants keep their bit pattern in an i64 operand"
)]
fn to_operand(value: i128) -> i64 {
    value as i64
}

impl Lowerer<'_> {
    /// The compile-time value of `expr`, if it has one.
    pub(crate) fn constant_of(&mut self, expr: &Expr) -> Option<Constant> {
        self.fold(expr).ok()
    }

    pub(crate) fn fold(&mut self, expr: &Expr) -> Result<Constant, FoldError> {
        match &expr.kind {
            ExprKind::Literal(literal) => {
                Constant::from_literal(literal).ok_or(FoldError::NotConstant)
            }
            ExprKind::Prefix { op, expr: operand } => {
                let value = self.fold(operand)?;
                fold_prefix(*op, &value).ok_or(FoldError::NotConstant)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.fold(left)?;
                let right = self.fold(right)?;
                if *op == BinaryOp::Div && is_zero(&right) {
                    return Err(FoldError::DivisionByZero(expr.pos));
                }
                fold_binary(*op, &left, &right).ok_or(FoldError::NotConstant)
            }
            ExprKind::Boolean { op, left, right } => {
                let left = self.fold(left)?;
                let right = self.fold(right)?;
                fold_boolean(*op, &left, &right).ok_or(FoldError::NotConstant)
            }
            ExprKind::Identifier(name) => {
                if self.func.scope.get(name).is_some() {
                    return Err(FoldError::NotConstant);
                }
                let Some(Symbol::Global(id)) = self.symbols.lookup(name) else {
                    return Err(FoldError::NotConstant);
                };
                let id = *id;
                self.resolve_global(id);
                self.symbols
                    .global(id)
                    .value
                    .clone()
                    .ok_or(FoldError::NotConstant)
            }
            _ => Err(FoldError::NotConstant),
        }
    }

    pub(crate) fn report_zero_division(&mut self, pos: Pos) {
        self.bag
            .error(ErrorCode::E2014, pos, "dividing by '0' at compile time");
    }

    /// The type a constant takes in the current context. Integers take an
    /// integer context and default to `i32`; floats take a float context
    /// and default to `f32`.
    pub(crate) fn constant_type(&mut self, constant: &Constant, pos: Pos) -> Type {
        let context = self.context();
        match constant {
            Constant::Int(value) => {
                let ty = if context.int_width().is_some() {
                    context
                } else {
                    Type::i32()
                };
                if let Some(width) = ty.int_width() {
                    if !width.contains(*value) {
                        if *value < 0 && !width.is_signed() {
                            self.bag.error(
                                ErrorCode::E2015,
                                pos,
                                "unsigned constant operation overflows",
                            );
                        } else {
                            self.bag.error(
                                ErrorCode::E2002,
                                pos,
                                format!("constant '{value}' does not fit in '{}'", width.as_str()),
                            );
                        }
                    }
                }
                ty
            }
            Constant::Float(_) => match context.kind {
                TypeKind::Float(_) => context,
                _ => Type::float(FloatWidth::F32),
            },
            Constant::Bool(_) => Type::bool(),
            Constant::Char(_) => Type::char(),
            Constant::Str(_) => Type::str(),
        }
    }

    pub(crate) fn constant_instruction(&mut self, constant: &Constant, ty: &Type) -> Instruction {
        let mir = self.mir_type(ty);
        let operand = match constant {
            Constant::Int(value) => Operand::Int(to_operand(*value)),
            Constant::Float(value) => Operand::Float(value.to_bits()),
            Constant::Bool(value) => Operand::Int(i64::from(*value)),
            Constant::Char(value) => Operand::Int(i64::from(u32::from(*value))),
            Constant::Str(value) => Operand::Str(value.clone()),
        };
        Instruction::new(InstructionKind::LoadConstant, mir, operand)
    }

    /// Type `constant` against the context and push it.
    pub(crate) fn emit_constant(&mut self, constant: &Constant, pos: Pos) -> Type {
        let ty = self.constant_type(constant, pos);
        let instr = self.constant_instruction(constant, &ty);
        self.emit_instruction(instr);
        ty
    }

    /// Type a constant operand after the type of the other operand, which
    /// is already known.
    pub(crate) fn constant_operand(&mut self, constant: &Constant, other: &Type, pos: Pos) -> Type {
        let ty = self.with_context(other.clone(), |this| this.constant_type(constant, pos));
        self.check(other, &ty, pos)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_integer_arithmetic() {
        let ten = Constant::Int(10);
        let two = Constant::Int(2);
        assert_eq!(fold_binary(BinaryOp::Mul, &ten, &two), Some(Constant::Int(20)));
        assert_eq!(fold_binary(BinaryOp::Sub, &two, &ten), Some(Constant::Int(-8)));
        assert_eq!(fold_binary(BinaryOp::Div, &ten, &Constant::Int(0)), None);
        assert_eq!(fold_binary(BinaryOp::Range, &two, &ten), None);
    }

    #[test]
    fn test_mixed_kinds_do_not_fold() {
        let int = Constant::Int(1);
        let float = Constant::Float(1.0);
        assert_eq!(fold_binary(BinaryOp::Add, &int, &float), None);
        assert_eq!(fold_boolean(BooleanOp::Eq, &int, &float), None);
    }

    #[test]
    fn test_comparisons() {
        let a = Constant::Char('a');
        let b = Constant::Char('b');
        assert_eq!(
            fold_boolean(BooleanOp::Less, &a, &b),
            Some(Constant::Bool(true))
        );
        assert_eq!(
            fold_boolean(BooleanOp::Geq, &a, &b),
            Some(Constant::Bool(false))
        );
        let yes = Constant::Bool(true);
        let no = Constant::Bool(false);
        assert_eq!(
            fold_boolean(BooleanOp::And, &yes, &no),
            Some(Constant::Bool(false))
        );
        assert_eq!(fold_boolean(BooleanOp::Less, &yes, &no), None);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(
            fold_prefix(PrefixOp::Neg, &Constant::Int(4)),
            Some(Constant::Int(-4))
        );
        assert_eq!(
            fold_prefix(PrefixOp::Not, &Constant::Bool(true)),
            Some(Constant::Bool(false))
        );
        assert_eq!(fold_prefix(PrefixOp::Not, &Constant::Int(1)), None);
        assert!(is_zero(&Constant::Float(0.0)));
        assert!(!is_zero(&Constant::Str(String::new())));
    }
}
