//! Expression lowering.
//!
//! Every `lower_*` method emits the instructions leaving the expression's
//! value on the stack and returns its Tern type. The expected type flows
//! down through the context stack; a void context means the value is
//! discarded.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{Expr, ExprKind, Ident, Modifier, PostfixOp};
use tern_ir::Pos;
use tern_mir::{InstructionKind, Operand};
use tern_stack::ensure_sufficient_stack;
use tern_types::{Constant, StructId, Symbol, Type, TypeKind};

use crate::lowerer::Lowerer;
use crate::ops::Step;

/// A resolved field of a struct.
#[derive(Clone, Debug)]
pub(crate) struct FieldAccess {
    pub(crate) index: u32,
    pub(crate) ty: Type,
}

impl Lowerer<'_> {
    /// Lower `expr` for its value under `context`. A void result reports
    /// E2005 and becomes undefined.
    pub(crate) fn lower_value(&mut self, expr: &Expr, context: Type) -> Type {
        let ty = self.with_context(context, |this| this.lower_expr(expr));
        let ty = self.types.resolve(&ty);
        if ty.is_void() {
            self.bag.error(
                ErrorCode::E2005,
                expr.pos,
                "expected a non-void expression",
            );
            return Type::undefined();
        }
        ty
    }

    /// Lower `expr` under the current context.
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> Type {
        ensure_sufficient_stack(|| self.lower_expr_inner(expr))
    }

    fn lower_expr_inner(&mut self, expr: &Expr) -> Type {
        let pos = expr.pos;
        match &expr.kind {
            ExprKind::Literal(literal) => match Constant::from_literal(literal) {
                Some(constant) => self.emit_constant(&constant, pos),
                None => {
                    let message = format!("malformed literal '{}'", literal.value);
                    self.bag.error(ErrorCode::E9001, pos, message);
                    Type::undefined()
                }
            },
            ExprKind::Identifier(name) => self.lower_identifier(name, pos),
            ExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right, pos),
            ExprKind::Boolean { op, left, right } => self.lower_boolean(*op, left, right, pos),
            ExprKind::Is { expr: inner, ty, .. } => {
                self.lower_value(inner, Type::undefined());
                self.resolve_type(ty);
                self.unsupported("'is' expression", pos);
                Type::bool()
            }
            ExprKind::Prefix { op, expr: inner } => self.lower_prefix(*op, inner, pos),
            ExprKind::Postfix { op, expr: inner } => {
                self.lower_step(inner, *op == PostfixOp::Increment, Step::Postfix, pos)
            }
            ExprKind::Member { base, member } => self.lower_member(base, member),
            ExprKind::Index { base, index } => self.lower_index(base, index, pos),
            ExprKind::Call(call) => self.lower_call(call, pos),
            ExprKind::Try(inner) => self.lower_try(inner, pos),
            ExprKind::Cast { expr: inner, ty } => self.lower_cast(inner, ty, pos),
            ExprKind::TypeAlloc { ty, fields } => self.lower_type_alloc(ty.as_ref(), fields, pos),
            ExprKind::ArrayAlloc {
                elem,
                size,
                elements,
            } => self.lower_array_alloc(elem, size.as_deref(), elements, pos),
            ExprKind::Block(block) => self.lower_block_value(block),
            ExprKind::Conditional(conditional) => self.lower_conditional(conditional),
            ExprKind::Switch {
                scrutinee,
                cases,
                default,
            } => self.lower_switch(scrutinee, cases, default.as_ref(), pos),
            ExprKind::Assignment { op, target, value } => {
                self.lower_assignment(*op, target, value, pos);
                Type::void()
            }
            ExprKind::Bad => Type::undefined(),
        }
    }

    fn lower_identifier(&mut self, name: &str, pos: Pos) -> Type {
        if let Some(local) = self.func.scope.get(name).cloned() {
            let mir = self.mir_type(&local.ty);
            self.emit(InstructionKind::LoadLocal, mir, Operand::Local(local.slot));
            return local.ty;
        }
        match self.symbols.lookup(name) {
            Some(Symbol::Global(id)) => {
                let id = *id;
                self.resolve_global(id);
                let entry = self.symbols.global(id);
                let ty = entry.ty.clone();
                match entry.value.clone() {
                    Some(value) => {
                        let instr = self.constant_instruction(&value, &ty);
                        self.emit_instruction(instr);
                    }
                    None => self.unsupported("reading a mutable global", pos),
                }
                ty
            }
            _ => {
                self.bag.error(
                    ErrorCode::E2032,
                    pos,
                    format!("undeclared identifier '{name}'"),
                );
                Type::undefined()
            }
        }
    }

    /// `Enum.Member`, or a field load.
    fn lower_member(&mut self, base: &Expr, member: &Ident) -> Type {
        if let Some(ty) = self.lower_enum_member(base, member) {
            return ty;
        }
        let Some((_, access)) = self.lower_field_base(base, member) else {
            return Type::undefined();
        };
        let mir = self.mir_type(&access.ty);
        self.emit(InstructionKind::LoadField, mir, Operand::Field(access.index));
        access.ty
    }

    fn lower_enum_member(&mut self, base: &Expr, member: &Ident) -> Option<Type> {
        let ExprKind::Identifier(name) = &base.kind else {
            return None;
        };
        if self.func.scope.get(name).is_some() {
            return None;
        }
        let Some(Symbol::Enum(id)) = self.symbols.lookup(name) else {
            return None;
        };
        let id = *id;
        self.resolve_enum(id);
        let ty = Type::new(TypeKind::Enum(id));
        let entry = self.symbols.get_enum(id);
        let Some(value) = entry.member(&member.name).cloned() else {
            self.bag.error(
                ErrorCode::E2018,
                member.pos,
                format!("type '{name}' has no member '{}'", member.name),
            );
            return Some(Type::undefined());
        };
        let instr = self.constant_instruction(&value, &ty);
        self.emit_instruction(instr);
        Some(ty)
    }

    /// Lower `base` and find `member` in its struct, leaving the struct
    /// on the stack. References and pointers are looked through once.
    pub(crate) fn lower_field_base(
        &mut self,
        base: &Expr,
        member: &Ident,
    ) -> Option<(Type, FieldAccess)> {
        let ty = self.lower_value(base, Type::undefined());
        let Some(id) = self.struct_of(&ty) else {
            if !ty.is_undefined() {
                let message = format!("member access needs a struct, got '{}'", self.show(&ty));
                self.bag.error(ErrorCode::E2023, member.pos, message);
            }
            return None;
        };
        let access = self.field_access(id, member)?;
        Some((Type::strukt(id), access))
    }

    /// The struct behind `ty`, looking through one `&` or `*`.
    pub(crate) fn struct_of(&self, ty: &Type) -> Option<StructId> {
        let ty = self.types.resolve(ty);
        match ty.kind {
            TypeKind::Struct(id) => Some(id),
            TypeKind::Reference | TypeKind::Pointer => ty.base().and_then(Type::struct_id),
            _ => None,
        }
    }

    /// Find a field, reporting E2018 if it is unknown and E2019 if it is
    /// private to another struct.
    pub(crate) fn field_access(&mut self, id: StructId, member: &Ident) -> Option<FieldAccess> {
        self.resolve_struct(id);
        let entry = self.symbols.get_struct(id);
        let Some((index, field)) = entry.field(&member.name) else {
            let message = format!("type '{}' has no field '{}'", entry.name, member.name);
            self.bag.error(ErrorCode::E2018, member.pos, message);
            return None;
        };
        if field.modifier == Modifier::Private && !self.can_access(id) {
            let message = format!("field '{}' of '{}' is private", member.name, entry.name);
            self.bag.error(ErrorCode::E2019, member.pos, message);
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "field counts are far below u32::MAX"
        )]
        let index = index as u32;
        Some(FieldAccess {
            index,
            ty: field.ty.clone(),
        })
    }

    /// Private members are visible inside the owner's own methods.
    pub(crate) fn can_access(&self, owner: StructId) -> bool {
        self.func.owner == Some(owner)
    }

    fn lower_index(&mut self, base: &Expr, index: &Expr, pos: Pos) -> Type {
        let ty = self.lower_value(base, Type::undefined());
        let index_ty = self.lower_value(index, Type::i32());
        if index_ty.int_width().is_none() && !index_ty.is_undefined() {
            let message = format!("index must be an integer, got '{}'", self.show(&index_ty));
            self.bag.error(ErrorCode::E2035, index.pos, message);
        }
        let elem = match ty.kind {
            TypeKind::Array | TypeKind::Pointer => {
                ty.base().cloned().unwrap_or_else(Type::undefined)
            }
            TypeKind::Str => Type::char(),
            TypeKind::Undefined => Type::undefined(),
            _ => {
                let message = format!("cannot index into '{}'", self.show(&ty));
                self.bag.error(ErrorCode::E2035, base.pos, message);
                Type::undefined()
            }
        };
        self.unsupported("index access", pos);
        elem
    }

    fn lower_try(&mut self, inner: &Expr, pos: Pos) -> Type {
        let ty = self.lower_value(inner, Type::undefined());
        let success = match ty.kind {
            TypeKind::EnumError => ty.payload.get(1).cloned().unwrap_or_else(Type::undefined),
            TypeKind::Undefined => Type::undefined(),
            _ => {
                let message = format!("'try' needs an error union, got '{}'", self.show(&ty));
                self.bag.error(ErrorCode::E2035, inner.pos, message);
                Type::undefined()
            }
        };
        self.unsupported("'try' expression", pos);
        success
    }
}
