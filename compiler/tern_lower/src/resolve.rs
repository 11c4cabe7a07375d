//! Type resolution: type nodes, declarations and signatures.
//!
//! Declarations are resolved on demand and at most once, guarded by
//! [`Resolution`]. Struct fields and signatures are resolved under the
//! generic environment of their declaration: placeholders for a
//! template, concrete arguments for an instantiation.

use smallvec::SmallVec;
use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::ast::{TypeNode, TypeNodeKind};
use tern_ir::Pos;
use tern_stack::ensure_sufficient_stack;
use tern_types::{
    Constant, EnumId, Field, FunctionId, GlobalId, IntWidth, Resolution, Signature, StructId,
    Symbol, Type, TypeFlags, TypeKind, VariantId,
};
use tracing::trace;

use crate::fold::FoldError;
use crate::lowerer::{Env, Lowerer, PendingBody};

/// Struct instances resolved one inside another before the type is
/// reported as recursive.
const MAX_INSTANCE_DEPTH: usize = 64;

impl Lowerer<'_> {
    pub(crate) fn resolve_type(&mut self, node: &TypeNode) -> Type {
        match &node.kind {
            TypeNodeKind::Primitive(primitive) => Type::from_primitive(*primitive),
            TypeNodeKind::Named { name, args } => self.resolve_named(name, args, node.pos),
            TypeNodeKind::Pointer(base) => Type::pointer(self.resolve_type(base)),
            TypeNodeKind::Reference(base) => Type::reference(self.resolve_type(base)),
            TypeNodeKind::Option(base) => Type::option(self.resolve_type(base)),
            TypeNodeKind::Array(base) => Type::array(self.resolve_type(base)),
            TypeNodeKind::Tuple(items) => {
                Type::tuple(items.iter().map(|item| self.resolve_type(item)).collect())
            }
            TypeNodeKind::EnumError { error, success } => {
                let error = self.resolve_type(error);
                Type::enum_error(error, self.resolve_type(success))
            }
            TypeNodeKind::Bad => Type::undefined(),
        }
    }

    fn resolve_named(&mut self, name: &str, args: &[TypeNode], pos: Pos) -> Type {
        if args.is_empty() {
            if let Some(ty) = self.func.env.get(name) {
                return ty.clone();
            }
            if name == "auto" {
                return self.types.fresh_auto();
            }
        }
        match self.symbols.lookup(name) {
            Some(Symbol::Struct(id)) => {
                let id = *id;
                self.resolve_struct_type(id, name, args, pos)
            }
            Some(Symbol::Enum(id)) if args.is_empty() => Type::new(TypeKind::Enum(*id)),
            Some(Symbol::Variant(id)) if args.is_empty() => Type::new(TypeKind::Variant(*id)),
            Some(Symbol::Enum(_) | Symbol::Variant(_)) => {
                self.bag.error(
                    ErrorCode::E2027,
                    pos,
                    format!("type '{name}' takes no generic arguments"),
                );
                Type::undefined()
            }
            _ => {
                self.bag
                    .error(ErrorCode::E2033, pos, format!("undeclared type '{name}'"));
                Type::undefined()
            }
        }
    }

    fn resolve_struct_type(
        &mut self,
        id: StructId,
        name: &str,
        args: &[TypeNode],
        pos: Pos,
    ) -> Type {
        let expected = self.symbols.get_struct(id).decl.generics.len();
        if args.len() != expected {
            self.bag.error(
                ErrorCode::E2027,
                pos,
                format!(
                    "type '{name}' expects {expected} generic argument(s), got {}",
                    args.len()
                ),
            );
            return Type::undefined();
        }
        if expected == 0 {
            return Type::strukt(id);
        }
        let args: Vec<Type> = args
            .iter()
            .map(|arg| {
                let ty = self.resolve_type(arg);
                self.types.resolve(&ty)
            })
            .collect();
        // Inside a template the arguments may still be placeholders.
        let open = TypeFlags::HAS_GENERIC | TypeFlags::HAS_AUTO | TypeFlags::HAS_UNDEFINED;
        if args.iter().any(|arg| arg.flags().intersects(open)) {
            return Type::undefined();
        }
        // Only a type whose fields need ever larger instances of
        // itself nests this deep.
        if self.instance_depth >= MAX_INSTANCE_DEPTH {
            self.bag.report(
                Diagnostic::error(ErrorCode::E2012)
                    .with_message(format!("recursive type '{name}'"))
                    .with_pos(pos),
            );
            let note = format!("instances of '{name}' nest without end");
            self.bag.note(ErrorCode::E2012, pos, note);
            return Type::undefined();
        }
        let instance = self.symbols.instantiate_struct(id, args);
        self.instance_depth += 1;
        ensure_sufficient_stack(|| self.resolve_struct(instance));
        self.instance_depth -= 1;
        Type::strukt(instance)
    }

    /// Environment a struct's fields and methods are resolved in.
    pub(crate) fn struct_env(&self, id: StructId) -> Env {
        let entry = self.symbols.get_struct(id);
        if entry.is_template() {
            entry
                .decl
                .generics
                .iter()
                .map(|g| (g.name.clone(), Type::generic(&g.name)))
                .collect()
        } else {
            entry
                .generic_env()
                .map(|(name, ty)| (name.to_owned(), ty.clone()))
                .collect()
        }
    }

    /// Run `f` with `env` as the generic environment.
    fn with_env<R>(&mut self, env: Env, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.func.env, env);
        let out = f(self);
        self.func.env = saved;
        out
    }

    // Structs

    pub(crate) fn resolve_struct(&mut self, id: StructId) {
        let entry = self.symbols.get_struct(id);
        if entry.resolution != Resolution::Declared {
            return;
        }
        let is_template = entry.is_template();
        let is_instance = !entry.args.is_empty();
        let decl_fields = entry.decl.fields.clone();
        trace!(name = %entry.name, "resolving struct");
        self.symbols.get_struct_mut(id).resolution = Resolution::InProgress;

        let env = self.struct_env(id);
        let fields = self.with_env(env, |this| {
            let mut fields: Vec<Field> = Vec::with_capacity(decl_fields.len());
            for field in &decl_fields {
                if fields.iter().any(|f| f.name == field.name.name) {
                    this.bag.error(
                        ErrorCode::E2011,
                        field.name.pos,
                        format!("field '{}' is already declared", field.name.name),
                    );
                    continue;
                }
                let ty = this.resolve_type(&field.ty);
                fields.push(Field {
                    name: field.name.name.clone(),
                    ty,
                    modifier: field.modifier,
                    pos: field.name.pos,
                });
            }
            fields
        });

        let entry = self.symbols.get_struct_mut(id);
        entry.fields = fields;
        entry.resolution = Resolution::Resolved;
        if !is_template {
            self.check_recursion(id);
        }
        if is_instance {
            self.queue_methods(id);
        }
    }

    /// Queue the non-generic methods of a concrete struct for lowering.
    pub(crate) fn queue_methods(&mut self, id: StructId) {
        let env = self.struct_env(id);
        for method in self.symbols.get_struct(id).methods.clone() {
            if self.symbols.function(method).is_template() {
                continue;
            }
            let name = self.symbols.function(method).name.clone();
            let signature = self.signature(method);
            self.pending.push_back(PendingBody {
                id: method,
                name,
                signature,
                env: env.clone(),
            });
        }
    }

    /// A struct may only contain itself through an indirection.
    fn check_recursion(&mut self, id: StructId) {
        let fields = self.symbols.get_struct(id).fields.clone();
        for field in &fields {
            let mut visiting = SmallVec::<[StructId; 8]>::new();
            if self.contains_struct(&field.ty, id, &mut visiting) {
                let entry = self.symbols.get_struct(id);
                let message = format!("recursive type '{}'", entry.name);
                let pos = entry.decl.name.pos;
                self.bag.report(
                    Diagnostic::error(ErrorCode::E2012)
                        .with_message(message)
                        .with_pos(pos),
                );
                let hint = format!("use '?{}' instead", self.show(&field.ty));
                self.bag.note(ErrorCode::E2012, field.pos, hint);
                return;
            }
        }
    }

    fn contains_struct(
        &mut self,
        ty: &Type,
        target: StructId,
        visiting: &mut SmallVec<[StructId; 8]>,
    ) -> bool {
        match &ty.kind {
            TypeKind::Struct(id) if *id == target => true,
            TypeKind::Struct(id) => {
                if visiting.contains(id) {
                    return false;
                }
                visiting.push(*id);
                self.resolve_struct(*id);
                let fields: Vec<Type> = self
                    .symbols
                    .get_struct(*id)
                    .fields
                    .iter()
                    .map(|field| field.ty.clone())
                    .collect();
                fields
                    .iter()
                    .any(|field| self.contains_struct(field, target, visiting))
            }
            TypeKind::Tuple | TypeKind::EnumError => ty
                .payload
                .iter()
                .any(|member| self.contains_struct(member, target, visiting)),
            TypeKind::Variant(id) => {
                self.resolve_variant(*id);
                let members = self.symbols.variant(*id).members.clone();
                members
                    .iter()
                    .any(|member| self.contains_struct(member, target, visiting))
            }
            _ => false,
        }
    }

    // Enums and variants

    pub(crate) fn resolve_enum(&mut self, id: EnumId) {
        if self.symbols.get_enum(id).resolution != Resolution::Declared {
            return;
        }
        self.symbols.get_enum_mut(id).resolution = Resolution::InProgress;
        let decl = self.symbols.get_enum(id).decl.clone();
        let base = match &decl.base {
            Some(node) => self.resolve_type(node),
            None => Type::int(IntWidth::U8),
        };

        let mut members: Vec<(String, Constant)> = Vec::with_capacity(decl.members.len());
        let mut next = base.int_width().map(|_| 0i128);
        for member in &decl.members {
            let name = &member.name.name;
            if members.iter().any(|(existing, _)| existing == name) {
                self.bag.error(
                    ErrorCode::E2011,
                    member.name.pos,
                    format!("member '{name}' is already declared"),
                );
                continue;
            }
            let value = match &member.value {
                Some(literal) => Constant::from_literal(literal),
                None => next.map(Constant::Int),
            };
            let value = match value {
                Some(value) if fits_base(&value, &base) => value,
                Some(_) => {
                    let message = format!(
                        "value of member '{name}' does not match the base type '{}'",
                        self.show(&base)
                    );
                    self.bag.error(ErrorCode::E2013, member.name.pos, message);
                    continue;
                }
                None => {
                    self.bag.error(
                        ErrorCode::E2013,
                        member.name.pos,
                        format!("member '{name}' needs an explicit value"),
                    );
                    continue;
                }
            };
            next = match value {
                Constant::Int(v) => v.checked_add(1),
                _ => None,
            };
            members.push((name.clone(), value));
        }

        let entry = self.symbols.get_enum_mut(id);
        entry.base = base;
        entry.members = members;
        entry.resolution = Resolution::Resolved;
    }

    pub(crate) fn resolve_variant(&mut self, id: VariantId) {
        if self.symbols.variant(id).resolution != Resolution::Declared {
            return;
        }
        self.symbols.variant_mut(id).resolution = Resolution::InProgress;
        let decl = self.symbols.variant(id).decl.clone();
        let mut members: Vec<Type> = Vec::with_capacity(decl.members.len());
        for node in &decl.members {
            let ty = self.resolve_type(node);
            if !ty.is_undefined() && members.contains(&ty) {
                let message = format!("'{}' appears twice in variant", self.show(&ty));
                self.bag.error(ErrorCode::E2011, node.pos, message);
                continue;
            }
            members.push(ty);
        }
        let entry = self.symbols.variant_mut(id);
        entry.members = members;
        entry.resolution = Resolution::Resolved;
    }

    // Globals

    /// Type-check a global. Constant initializers are folded; anything
    /// else cannot be lowered yet.
    pub(crate) fn resolve_global(&mut self, id: GlobalId) {
        if self.symbols.global(id).resolution != Resolution::Declared {
            return;
        }
        self.symbols.global_mut(id).resolution = Resolution::InProgress;
        let decl = self.symbols.global(id).decl.decl.clone();
        if decl.is_const && decl.value.is_none() {
            self.bag.error(
                ErrorCode::E2008,
                decl.name.pos,
                format!("constant '{}' needs a value", decl.name.name),
            );
        }
        if decl.ty.is_none() && decl.value.is_none() {
            self.bag
                .error(ErrorCode::E2009, decl.name.pos, "type notation needed");
        }

        let declared = match &decl.ty {
            Some(node) => self.resolve_type(node),
            None => self.types.fresh_auto(),
        };
        let mut value = None;
        if let Some(expr) = &decl.value {
            match self.fold(expr) {
                Ok(constant) => {
                    let ty = self.with_context(declared.clone(), |this| {
                        this.constant_type(&constant, expr.pos)
                    });
                    self.check(&declared, &ty, expr.pos);
                    value = Some(constant);
                }
                Err(FoldError::DivisionByZero(pos)) => self.report_zero_division(pos),
                Err(FoldError::NotConstant) => {
                    self.unsupported("a non-constant global initializer", expr.pos);
                }
            }
        }
        let ty = self.types.resolve(&declared);
        let ty = if ty.as_auto().is_some() {
            Type::undefined()
        } else {
            ty
        };

        let entry = self.symbols.global_mut(id);
        entry.ty = ty;
        entry.value = if decl.is_const { value } else { None };
        entry.resolution = Resolution::Resolved;
    }

    // Signatures

    /// Environment a function body is lowered in: its owner's, plus its
    /// own generic parameters bound to `args`, or to placeholders when
    /// `args` is empty.
    pub(crate) fn function_env(&self, id: FunctionId, args: &[Type]) -> Env {
        let entry = self.symbols.function(id);
        let mut env = entry
            .owner
            .map(|owner| self.struct_env(owner))
            .unwrap_or_default();
        for (i, generic) in entry.decl.generics.iter().enumerate() {
            let ty = args
                .get(i)
                .cloned()
                .unwrap_or_else(|| Type::generic(&generic.name));
            env.insert(generic.name.clone(), ty);
        }
        env
    }

    /// The signature of a function. Concrete signatures are cached on
    /// the entry; a template's is resolved against placeholders.
    pub(crate) fn signature(&mut self, id: FunctionId) -> Signature {
        let entry = self.symbols.function(id);
        if let Some(signature) = &entry.signature {
            return signature.clone();
        }
        let cacheable = !entry.is_template()
            && match entry.owner {
                Some(owner) => !self.symbols.get_struct(owner).is_template(),
                None => true,
            };
        let env = self.function_env(id, &[]);
        let signature = self.resolve_signature(id, env);
        if cacheable {
            self.symbols.function_mut(id).signature = Some(signature.clone());
        }
        signature
    }

    pub(crate) fn resolve_signature(&mut self, id: FunctionId, env: Env) -> Signature {
        let decl = self.symbols.function(id).decl.clone();
        self.with_env(env, |this| {
            let params = decl
                .params
                .iter()
                .map(|param| this.resolve_type(&param.ty))
                .collect();
            let ret = match &decl.ret {
                Some(node) => this.resolve_type(node),
                None => Type::void(),
            };
            Signature { params, ret }
        })
    }
}

fn fits_base(value: &Constant, base: &Type) -> bool {
    match (&base.kind, value) {
        (TypeKind::Int(width), Constant::Int(v)) => width.contains(*v),
        (TypeKind::Float(_), Constant::Float(_))
        | (TypeKind::Str, Constant::Str(_))
        | (TypeKind::Char, Constant::Char(_))
        | (TypeKind::Bool, Constant::Bool(_))
        | (TypeKind::Undefined, _) => true,
        _ => false,
    }
}
