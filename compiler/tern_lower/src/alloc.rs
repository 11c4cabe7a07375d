//! `new` expressions.

use smallvec::SmallVec;
use tern_diagnostic::ErrorCode;
use tern_ir::ast::{Expr, FieldInit, TypeNode};
use tern_ir::Pos;
use tern_mir::{InstructionKind, Operand};
use tern_types::{StructId, Type, TypeKind};

use crate::lowerer::Lowerer;

impl Lowerer<'_> {
    /// `new S { field: value, .. }`, or `new { .. }` typed by the context.
    ///
    /// The struct is zero-initialized and each listed field stored in turn.
    /// Omitted `str` fields are set to the empty string. Fields holding a
    /// pointer, reference, option or variant must be listed.
    pub(crate) fn lower_type_alloc(
        &mut self,
        ty: Option<&TypeNode>,
        fields: &[FieldInit],
        pos: Pos,
    ) -> Type {
        let target = match ty {
            Some(node) => self.resolve_type(node),
            None => {
                let context = self.context();
                if context.as_auto().is_some() {
                    self.bag.error(ErrorCode::E2009, pos, "type notation needed");
                    return Type::undefined();
                }
                context
            }
        };
        let target = self.types.resolve(&target);
        if target.is_undefined() {
            return target;
        }
        if target.kind == TypeKind::Option && fields.is_empty() {
            let mir = self.mir_type(&target);
            self.emit(InstructionKind::LoadZeroinitialized, mir, Operand::None);
            return target;
        }
        let Some(id) = target.struct_id() else {
            let message = format!("unable to allocate type '{}'", self.show(&target));
            self.bag.error(ErrorCode::E2016, pos, message);
            return Type::undefined();
        };
        self.resolve_struct(id);
        if self.symbols.size_of(&target, self.config.pointer_width.bytes()) == Some(0) {
            let message = format!("unable to allocate a static type '{}'", self.show(&target));
            self.bag.error(ErrorCode::E2031, pos, message);
            return target;
        }

        let mir = self.mir_type(&target);
        self.emit(InstructionKind::LoadZeroinitialized, mir.clone(), Operand::None);
        let mut assigned: SmallVec<[u32; 8]> = SmallVec::new();
        for init in fields {
            let Some(access) = self.field_access(id, &init.name) else {
                continue;
            };
            if assigned.contains(&access.index) {
                self.bag.error(
                    ErrorCode::E2017,
                    init.name.pos,
                    format!("field '{}' assigned twice", init.name.name),
                );
                continue;
            }
            assigned.push(access.index);
            self.emit(InstructionKind::Duplicate, mir.clone(), Operand::None);
            let value_ty = self.lower_value(&init.value, access.ty.clone());
            self.check(&access.ty, &value_ty, init.value.pos);
            let field_mir = self.mir_type(&access.ty);
            self.emit(
                InstructionKind::StoreField,
                field_mir,
                Operand::Field(access.index),
            );
        }

        let omitted: Vec<(u32, String, Type)> = self
            .symbols
            .get_struct(id)
            .fields
            .iter()
            .zip(0u32..)
            .filter(|(_, i)| !assigned.contains(i))
            .map(|(field, i)| (i, field.name.clone(), field.ty.clone()))
            .collect();
        for (index, name, ty) in omitted {
            let mut visiting = SmallVec::<[StructId; 8]>::new();
            if self.needs_explicit_init(&ty, &mut visiting) {
                self.bag.error(
                    ErrorCode::E2022,
                    pos,
                    format!("field '{name}' must be explicitly initialized"),
                );
            } else if self.types.resolve(&ty).kind == TypeKind::Str {
                // A zeroed str is a null pointer, not "".
                self.emit(InstructionKind::Duplicate, mir.clone(), Operand::None);
                let str_mir = self.mir_type(&ty);
                self.emit(
                    InstructionKind::LoadConstant,
                    str_mir.clone(),
                    Operand::Str(String::new()),
                );
                self.emit(InstructionKind::StoreField, str_mir, Operand::Field(index));
            }
        }
        target
    }

    /// Types whose zero value is not a valid value.
    fn needs_explicit_init(&mut self, ty: &Type, visiting: &mut SmallVec<[StructId; 8]>) -> bool {
        match ty.kind {
            TypeKind::Pointer | TypeKind::Reference | TypeKind::Option | TypeKind::Variant(_) => {
                true
            }
            TypeKind::Struct(id) => {
                if visiting.contains(&id) {
                    return false;
                }
                visiting.push(id);
                self.resolve_struct(id);
                let fields: Vec<Type> = self
                    .symbols
                    .get_struct(id)
                    .fields
                    .iter()
                    .map(|field| field.ty.clone())
                    .collect();
                fields
                    .iter()
                    .any(|field| self.needs_explicit_init(field, visiting))
            }
            _ => false,
        }
    }

    /// `new [T, size] { elements }`. Checked, but not lowered yet.
    pub(crate) fn lower_array_alloc(
        &mut self,
        elem: &TypeNode,
        size: Option<&Expr>,
        elements: &[Expr],
        pos: Pos,
    ) -> Type {
        let elem_ty = self.resolve_type(elem);
        if let Some(size) = size {
            let ty = self.lower_value(size, Type::i32());
            if ty.int_width().is_none() && !ty.is_undefined() {
                let message = format!("array size must be an integer, got '{}'", self.show(&ty));
                self.bag.error(ErrorCode::E2002, size.pos, message);
            }
        }
        for element in elements {
            let ty = self.lower_value(element, elem_ty.clone());
            self.check(&elem_ty, &ty, element.pos);
        }
        self.unsupported("array allocation", pos);
        Type::array(elem_ty)
    }
}
