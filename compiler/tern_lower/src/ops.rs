//! Operators, assignment and casts.
//!
//! Binary operators fold when both operands are constant. When only one
//! is, the other is lowered first and the constant takes its type; a
//! constant left operand is then inserted ahead of the right operand's
//! code so evaluation order is preserved.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{AssignOp, BinaryOp, BooleanOp, Expr, ExprKind, PrefixOp, TypeNode};
use tern_ir::Pos;
use tern_mir::{InstructionKind, MirType, Operand};
use tern_types::{Constant, Symbol, Type, TypeFlags, TypeKind};

use crate::fold::{fold_binary, fold_boolean, fold_prefix, is_zero};
use crate::lowerer::Lowerer;
use crate::scope::Local;

/// How an increment or decrement is used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// On its own; leaves nothing.
    Statement,
    /// `++x`: leaves the new value.
    Prefix,
    /// `x++`: leaves the old value.
    Postfix,
}

/// Where an assignment stores.
enum Place {
    Local { name: String, local: Local },
    /// The owning struct is on the stack.
    Field { owner: Type, index: u32, ty: Type },
}

fn arith_instruction(op: BinaryOp) -> Option<InstructionKind> {
    match op {
        BinaryOp::Add => Some(InstructionKind::Add),
        BinaryOp::Sub => Some(InstructionKind::Sub),
        BinaryOp::Mul => Some(InstructionKind::Mul),
        BinaryOp::Div => Some(InstructionKind::Div),
        BinaryOp::Range => None,
    }
}

fn compare_instruction(op: BooleanOp) -> Option<InstructionKind> {
    match op {
        BooleanOp::Eq => Some(InstructionKind::Ceq),
        BooleanOp::Neq => Some(InstructionKind::Neq),
        BooleanOp::Less => Some(InstructionKind::Less),
        BooleanOp::Greater => Some(InstructionKind::Greater),
        BooleanOp::Leq => Some(InstructionKind::Leq),
        BooleanOp::Geq => Some(InstructionKind::Geq),
        BooleanOp::In | BooleanOp::And | BooleanOp::Or => None,
    }
}

fn is_numeric(ty: &Type) -> bool {
    ty.flags().contains(TypeFlags::IS_NUMERIC)
}

impl Lowerer<'_> {
    // Arithmetic

    pub(crate) fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        pos: Pos,
    ) -> Type {
        if op == BinaryOp::Range {
            let ty = self.lower_value(left, Type::undefined());
            self.lower_value(right, ty.clone());
            self.unsupported("range expression", pos);
            return Type::undefined();
        }
        let left_constant = self.constant_of(left);
        let right_constant = self.constant_of(right);
        match (left_constant, right_constant) {
            (Some(l), Some(r)) => {
                if op == BinaryOp::Div && is_zero(&r) {
                    self.report_zero_division(right.pos);
                    return self.emit_constant(&l, pos);
                }
                match fold_binary(op, &l, &r) {
                    Some(value) => self.emit_constant(&value, pos),
                    None => self.lower_binary_operands(op, left, right, pos),
                }
            }
            (Some(l), None) => {
                let mark = self.func.builder.mark();
                let ty = self.lower_value(right, self.context());
                let ty = self.constant_operand(&l, &ty, left.pos);
                let instr = self.constant_instruction(&l, &ty);
                self.func.builder.insert_at(mark, instr);
                self.emit_arithmetic(op, &ty, pos)
            }
            (None, Some(r)) => {
                let ty = self.lower_value(left, self.context());
                if op == BinaryOp::Div && is_zero(&r) {
                    self.report_zero_division(right.pos);
                }
                let ty = self.constant_operand(&r, &ty, right.pos);
                let instr = self.constant_instruction(&r, &ty);
                self.emit_instruction(instr);
                self.emit_arithmetic(op, &ty, pos)
            }
            (None, None) => self.lower_binary_operands(op, left, right, pos),
        }
    }

    fn lower_binary_operands(&mut self, op: BinaryOp, left: &Expr, right: &Expr, pos: Pos) -> Type {
        let ty = self.lower_value(left, self.context());
        let right_ty = self.lower_value(right, ty.clone());
        let ty = self.check(&ty, &right_ty, right.pos);
        self.emit_arithmetic(op, &ty, pos)
    }

    /// Emit the instruction for `op` on two operands of type `ty`.
    fn emit_arithmetic(&mut self, op: BinaryOp, ty: &Type, pos: Pos) -> Type {
        let ty = self.types.resolve(ty);
        if ty.is_undefined() {
            return ty;
        }
        let Some(kind) = arith_instruction(op).filter(|_| is_numeric(&ty)) else {
            let message = format!(
                "operator '{}' cannot be applied to '{}'",
                op.as_str(),
                self.show(&ty)
            );
            self.bag.error(ErrorCode::E2035, pos, message);
            return Type::undefined();
        };
        let mir = self.mir_type(&ty);
        self.emit(kind, mir, Operand::None);
        ty
    }

    // Comparisons and logic

    pub(crate) fn lower_boolean(
        &mut self,
        op: BooleanOp,
        left: &Expr,
        right: &Expr,
        pos: Pos,
    ) -> Type {
        if op == BooleanOp::In {
            let ty = self.lower_value(left, Type::undefined());
            self.lower_value(right, Type::array(ty));
            self.unsupported("'in' expression", pos);
            return Type::bool();
        }
        if op.is_logical() {
            return self.lower_logical(op, left, right, pos);
        }
        let left_constant = self.constant_of(left);
        let right_constant = self.constant_of(right);
        match (left_constant, right_constant) {
            (Some(l), Some(r)) => match fold_boolean(op, &l, &r) {
                Some(value) => self.emit_constant(&value, pos),
                None => self.lower_compare_operands(op, left, right, pos),
            },
            (Some(l), None) => {
                let mark = self.func.builder.mark();
                let ty = self.lower_value(right, Type::undefined());
                let ty = self.constant_operand(&l, &ty, left.pos);
                let instr = self.constant_instruction(&l, &ty);
                self.func.builder.insert_at(mark, instr);
                self.emit_compare(op, &ty, pos)
            }
            (None, Some(r)) => {
                let ty = self.lower_value(left, Type::undefined());
                let ty = self.constant_operand(&r, &ty, right.pos);
                let instr = self.constant_instruction(&r, &ty);
                self.emit_instruction(instr);
                self.emit_compare(op, &ty, pos)
            }
            (None, None) => self.lower_compare_operands(op, left, right, pos),
        }
    }

    fn lower_compare_operands(
        &mut self,
        op: BooleanOp,
        left: &Expr,
        right: &Expr,
        pos: Pos,
    ) -> Type {
        let ty = self.lower_value(left, Type::undefined());
        let right_ty = self.lower_value(right, ty.clone());
        let ty = self.check(&ty, &right_ty, right.pos);
        self.emit_compare(op, &ty, pos)
    }

    fn emit_compare(&mut self, op: BooleanOp, ty: &Type, pos: Pos) -> Type {
        let ty = self.types.resolve(ty);
        if ty.is_undefined() {
            return Type::bool();
        }
        let comparable = if matches!(op, BooleanOp::Eq | BooleanOp::Neq) {
            is_numeric(&ty)
                || matches!(ty.kind, TypeKind::Bool | TypeKind::Char | TypeKind::Enum(_))
        } else {
            is_numeric(&ty) || ty.kind == TypeKind::Char
        };
        match compare_instruction(op).filter(|_| comparable) {
            Some(kind) => {
                let mir = self.mir_type(&ty);
                self.emit(kind, mir, Operand::None);
            }
            None => {
                let message = format!(
                    "operator '{}' cannot be applied to '{}'",
                    op.as_str(),
                    self.show(&ty)
                );
                self.bag.error(ErrorCode::E2035, pos, message);
            }
        }
        Type::bool()
    }

    /// `a && b` and `a || b` evaluate `b` only when needed, through a
    /// temporary holding the result.
    fn lower_logical(&mut self, op: BooleanOp, left: &Expr, right: &Expr, pos: Pos) -> Type {
        let left_constant = self.constant_of(left);
        let right_constant = self.constant_of(right);
        for (operand, constant) in [(left, &left_constant), (right, &right_constant)] {
            if matches!(constant, Some(Constant::Bool(_))) {
                self.bag.warning(
                    ErrorCode::W2002,
                    operand.pos,
                    "constant boolean in boolean expression",
                );
            }
        }
        if let (Some(l), Some(r)) = (&left_constant, &right_constant) {
            if let Some(value) = fold_boolean(op, l, r) {
                return self.emit_constant(&value, pos);
            }
        }

        self.lower_condition(left);
        let rhs = self.func.builder.new_block("rhs");
        let short = self.func.builder.new_block("short");
        let end = self.func.builder.new_block("end");
        let slot = self.func.builder.declare_local(MirType::BOOL, true);
        if op == BooleanOp::And {
            self.emit_branch(rhs, short);
        } else {
            self.emit_branch(short, rhs);
        }

        self.func.builder.position_at(rhs);
        self.lower_condition(right);
        self.emit(InstructionKind::StoreLocal, MirType::BOOL, Operand::Local(slot));
        self.func.builder.emit_jump(end);

        self.func.builder.position_at(short);
        let value = i64::from(op == BooleanOp::Or);
        self.emit(InstructionKind::LoadConstant, MirType::BOOL, Operand::Int(value));
        self.emit(InstructionKind::StoreLocal, MirType::BOOL, Operand::Local(slot));
        self.func.builder.emit_jump(end);

        self.func.builder.position_at(end);
        self.emit(InstructionKind::LoadLocal, MirType::BOOL, Operand::Local(slot));
        Type::bool()
    }

    // Prefix operators

    pub(crate) fn lower_prefix(&mut self, op: PrefixOp, operand: &Expr, pos: Pos) -> Type {
        if matches!(op, PrefixOp::Neg | PrefixOp::Plus | PrefixOp::Not) {
            if let Some(value) = self.constant_of(operand) {
                if let Some(folded) = fold_prefix(op, &value) {
                    return self.emit_constant(&folded, pos);
                }
            }
        }
        match op {
            PrefixOp::Neg | PrefixOp::Plus => {
                let ty = self.lower_value(operand, self.context());
                let accepted = if op == PrefixOp::Neg {
                    ty.is_signed_numeric()
                } else {
                    is_numeric(&ty)
                };
                if !accepted && !ty.is_undefined() {
                    let message = format!(
                        "operator '{}' cannot be applied to '{}'",
                        op.as_str(),
                        self.show(&ty)
                    );
                    self.bag.error(ErrorCode::E2004, operand.pos, message);
                    return Type::undefined();
                }
                if op == PrefixOp::Neg && !ty.is_undefined() {
                    let mir = self.mir_type(&ty);
                    self.emit(InstructionKind::Neg, mir, Operand::None);
                }
                ty
            }
            PrefixOp::Not => {
                self.lower_condition(operand);
                self.emit(InstructionKind::LoadConstant, MirType::BOOL, Operand::Int(0));
                self.emit(InstructionKind::Ceq, MirType::BOOL, Operand::None);
                Type::bool()
            }
            PrefixOp::AddressOf => {
                let ty = self.lower_value(operand, Type::undefined());
                self.unsupported("the address-of operator", pos);
                Type::reference(ty)
            }
            PrefixOp::Deref => {
                let ty = self.lower_value(operand, Type::undefined());
                let target = match ty.kind {
                    TypeKind::Pointer | TypeKind::Reference => {
                        ty.base().cloned().unwrap_or_else(Type::undefined)
                    }
                    TypeKind::Undefined => Type::undefined(),
                    _ => {
                        let message = format!("cannot dereference '{}'", self.show(&ty));
                        self.bag.error(ErrorCode::E2004, operand.pos, message);
                        Type::undefined()
                    }
                };
                self.unsupported("the dereference operator", pos);
                target
            }
            PrefixOp::Increment | PrefixOp::Decrement => {
                let mode = if self.context().is_void() {
                    Step::Statement
                } else {
                    Step::Prefix
                };
                self.lower_step(operand, op == PrefixOp::Increment, mode, pos)
            }
        }
    }

    // Assignment

    /// Resolve an assignment target. A field target leaves its owner on
    /// the stack.
    fn lower_place(&mut self, target: &Expr) -> Option<Place> {
        match &target.kind {
            ExprKind::Identifier(name) => {
                if let Some(local) = self.func.scope.get(name).cloned() {
                    return Some(Place::Local {
                        name: name.clone(),
                        local,
                    });
                }
                if let Some(Symbol::Global(_)) = self.symbols.lookup(name) {
                    self.unsupported("assigning to a global", target.pos);
                } else {
                    self.bag.error(
                        ErrorCode::E2032,
                        target.pos,
                        format!("undeclared identifier '{name}'"),
                    );
                }
                None
            }
            ExprKind::Member { base, member } => {
                let (owner, access) = self.lower_field_base(base, member)?;
                Some(Place::Field {
                    owner,
                    index: access.index,
                    ty: access.ty,
                })
            }
            ExprKind::Index { .. } | ExprKind::Prefix { op: PrefixOp::Deref, .. } => {
                self.lower_value(target, Type::undefined());
                None
            }
            ExprKind::Bad => None,
            _ => {
                self.bag
                    .error(ErrorCode::E2006, target.pos, "invalid assignment target");
                None
            }
        }
    }

    fn check_mutable(&mut self, name: &str, local: &Local, pos: Pos) {
        if local.is_const {
            self.bag.error(
                ErrorCode::E2007,
                pos,
                format!("cannot assign to constant '{name}'"),
            );
        }
    }

    pub(crate) fn lower_assignment(&mut self, op: AssignOp, target: &Expr, value: &Expr, pos: Pos) {
        let Some(place) = self.lower_place(target) else {
            self.lower_value(value, Type::undefined());
            return;
        };
        match place {
            Place::Local { name, local } => {
                self.check_mutable(&name, &local, target.pos);
                let mir = self.mir_type(&local.ty);
                if let Some(binary) = op.binary() {
                    self.emit(InstructionKind::LoadLocal, mir.clone(), Operand::Local(local.slot));
                    self.lower_operand(value, &local.ty);
                    self.emit_arithmetic(binary, &local.ty, pos);
                } else {
                    self.lower_operand(value, &local.ty);
                }
                self.emit(InstructionKind::StoreLocal, mir, Operand::Local(local.slot));
            }
            Place::Field { owner, index, ty } => {
                let mir = self.mir_type(&ty);
                if let Some(binary) = op.binary() {
                    let owner_mir = self.mir_type(&owner);
                    self.emit(InstructionKind::Duplicate, owner_mir, Operand::None);
                    self.emit(InstructionKind::LoadField, mir.clone(), Operand::Field(index));
                    self.lower_operand(value, &ty);
                    self.emit_arithmetic(binary, &ty, pos);
                } else {
                    self.lower_operand(value, &ty);
                }
                self.emit(InstructionKind::StoreField, mir, Operand::Field(index));
            }
        }
    }

    /// Lower `value` against `expected` and check it.
    fn lower_operand(&mut self, value: &Expr, expected: &Type) {
        let ty = self.lower_value(value, expected.clone());
        self.check(expected, &ty, value.pos);
    }

    /// `++`/`--` on a local or a field.
    pub(crate) fn lower_step(
        &mut self,
        target: &Expr,
        increment: bool,
        mode: Step,
        pos: Pos,
    ) -> Type {
        let op = if increment { BinaryOp::Add } else { BinaryOp::Sub };
        let Some(place) = self.lower_place(target) else {
            return Type::undefined();
        };
        let ty = match &place {
            Place::Local { local, .. } => local.ty.clone(),
            Place::Field { ty, .. } => ty.clone(),
        };
        if !ty.flags().contains(TypeFlags::IS_INTEGER) && !ty.is_undefined() {
            let symbol = if increment { "++" } else { "--" };
            let message = format!("operator '{symbol}' cannot be applied to '{}'", self.show(&ty));
            self.bag.error(ErrorCode::E2035, pos, message);
            return Type::undefined();
        }
        let mir = self.mir_type(&ty);
        match place {
            Place::Local { name, local } => {
                self.check_mutable(&name, &local, target.pos);
                self.emit(InstructionKind::LoadLocal, mir.clone(), Operand::Local(local.slot));
                if mode == Step::Postfix {
                    self.emit(InstructionKind::Duplicate, mir.clone(), Operand::None);
                }
                self.emit(InstructionKind::LoadConstant, mir.clone(), Operand::Int(1));
                self.emit_arithmetic(op, &ty, pos);
                if mode == Step::Prefix {
                    self.emit(InstructionKind::Duplicate, mir.clone(), Operand::None);
                }
                self.emit(InstructionKind::StoreLocal, mir, Operand::Local(local.slot));
            }
            Place::Field { owner, index, .. } => {
                if mode != Step::Statement {
                    self.unsupported("'++' and '--' on a field inside an expression", pos);
                    return ty;
                }
                let owner_mir = self.mir_type(&owner);
                self.emit(InstructionKind::Duplicate, owner_mir, Operand::None);
                self.emit(InstructionKind::LoadField, mir.clone(), Operand::Field(index));
                self.emit(InstructionKind::LoadConstant, mir.clone(), Operand::Int(1));
                self.emit_arithmetic(op, &ty, pos);
                self.emit(InstructionKind::StoreField, mir, Operand::Field(index));
            }
        }
        if mode == Step::Statement {
            Type::void()
        } else {
            ty
        }
    }

    // Casts

    pub(crate) fn lower_cast(&mut self, inner: &Expr, ty: &TypeNode, pos: Pos) -> Type {
        let target = self.resolve_type(ty);
        let source = self.lower_value(inner, Type::undefined());
        let target = self.types.resolve(&target);
        if source.is_undefined() || target.is_undefined() {
            return target;
        }
        if source == target {
            let message = format!("useless cast to '{}'", self.show(&target));
            self.bag.warning(ErrorCode::W2001, pos, message);
            return target;
        }
        if self.casts_to_int(&source) && target.int_width().is_some() {
            let mir = self.mir_type(&target);
            self.emit(InstructionKind::CastIntToInt, mir, Operand::None);
        } else {
            let message = format!(
                "invalid cast from '{}' to '{}'",
                self.show(&source),
                self.show(&target)
            );
            self.bag.error(ErrorCode::E2028, pos, message);
        }
        target
    }

    /// Integer-like values: integers, `bool`, `chr` and integer enums.
    pub(crate) fn casts_to_int(&self, ty: &Type) -> bool {
        match ty.kind {
            TypeKind::Int(_) | TypeKind::Bool | TypeKind::Char => true,
            TypeKind::Enum(id) => self.symbols.get_enum(id).base.int_width().is_some(),
            _ => false,
        }
    }
}
