//! The lowering context shared by every construct.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tern_diagnostic::{DiagnosticBag, ErrorCode};
use tern_ir::ast::Ident;
use tern_ir::Pos;
use tern_mir::{
    FunctionBuilder, Instruction, InstructionKind, MirModule, MirStruct, MirType, Operand,
};
use tern_types::{
    FunctionId, Mismatch, Signature, StructId, SymbolTable, Type, TypeKind, TypeTable, VariantId,
};

use crate::scope::{Local, Scope};
use crate::LowerConfig;

/// Substitutions for generic parameter names.
pub(crate) type Env = FxHashMap<String, Type>;

/// A function body waiting to be lowered.
#[derive(Clone, Debug)]
pub(crate) struct PendingBody {
    pub(crate) id: FunctionId,
    /// Lowered name, e.g. `max<i32>` or `Box<u8>.get`.
    pub(crate) name: String,
    pub(crate) signature: Signature,
    pub(crate) env: Env,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct LoopTargets {
    pub(crate) continue_block: u32,
    pub(crate) exit_block: u32,
}

/// State of the function being lowered.
pub(crate) struct FnState {
    pub(crate) builder: FunctionBuilder,
    pub(crate) scope: Scope,
    /// The context-type stack.
    context: Vec<Type>,
    pub(crate) loops: Vec<LoopTargets>,
    pub(crate) env: Env,
    /// Struct whose method this is; grants access to private members.
    pub(crate) owner: Option<StructId>,
    pub(crate) ret: Type,
}

impl FnState {
    pub(crate) fn new(
        builder: FunctionBuilder,
        ret: Type,
        env: Env,
        owner: Option<StructId>,
    ) -> Self {
        FnState {
            builder,
            scope: Scope::new(),
            context: Vec::new(),
            loops: Vec::new(),
            env,
            owner,
            ret,
        }
    }

    /// State used outside any function body. Nothing it emits is kept.
    fn detached() -> Self {
        FnState::new(
            FunctionBuilder::new("", Vec::new(), MirType::Void),
            Type::void(),
            Env::default(),
            None,
        )
    }
}

pub(crate) struct Lowerer<'a> {
    pub(crate) symbols: &'a mut SymbolTable,
    pub(crate) bag: &'a mut DiagnosticBag,
    pub(crate) config: &'a LowerConfig,
    pub(crate) types: TypeTable,
    pub(crate) module: MirModule,
    pub(crate) func: FnState,
    pub(crate) pending: VecDeque<PendingBody>,
    /// MIR struct names already laid out, or being laid out.
    laid_out: FxHashSet<String>,
    /// How many struct instances are being resolved, one inside another.
    pub(crate) instance_depth: usize,
}

impl<'a> Lowerer<'a> {
    pub(crate) fn new(
        symbols: &'a mut SymbolTable,
        bag: &'a mut DiagnosticBag,
        config: &'a LowerConfig,
    ) -> Self {
        Lowerer {
            symbols,
            bag,
            config,
            types: TypeTable::new(),
            module: MirModule::new(),
            func: FnState::detached(),
            pending: VecDeque::new(),
            laid_out: FxHashSet::default(),
            instance_depth: 0,
        }
    }

    pub(crate) fn finish(self) -> MirModule {
        self.module
    }

    // Context types

    /// Top of the context-type stack. Undefined outside any expression.
    pub(crate) fn context(&self) -> Type {
        match self.func.context.last() {
            Some(ty) => self.types.resolve(ty),
            None => Type::undefined(),
        }
    }

    pub(crate) fn with_context<R>(&mut self, ty: Type, f: impl FnOnce(&mut Self) -> R) -> R {
        self.func.context.push(ty);
        let out = f(self);
        self.func.context.pop();
        out
    }

    // Checking

    /// Unify `actual` with `expected`, reporting E2002 on failure. Returns
    /// the unified type, or `expected` as the best guess.
    pub(crate) fn check(&mut self, expected: &Type, actual: &Type, pos: Pos) -> Type {
        match self.types.unify(expected, actual) {
            Ok(ty) => ty,
            Err(Mismatch { expected, actual }) => {
                let message = format!(
                    "type mismatch: expected '{}', got '{}'",
                    self.show(&expected),
                    self.show(&actual)
                );
                self.bag.error(ErrorCode::E2002, pos, message);
                expected
            }
        }
    }

    /// Display name of a type, autos resolved.
    pub(crate) fn show(&self, ty: &Type) -> String {
        let ty = self.types.resolve(ty);
        self.symbols.display(&ty).to_string()
    }

    pub(crate) fn unsupported(&mut self, what: &str, pos: Pos) {
        self.bag.error(
            ErrorCode::E9002,
            pos,
            format!("{what} is not supported by this backend yet"),
        );
    }

    /// Run `f`, then forget everything it emitted, reported, solved,
    /// declared or instantiated. Used to try argument types against an
    /// overload before choosing it.
    pub(crate) fn speculate<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let checkpoint = self.func.builder.checkpoint();
        let mark = self.bag.mark();
        let types = self.types.clone();
        let scope = self.func.scope.clone();
        let instances = self.symbols.instance_mark();
        let pending = self.pending.len();
        let layouts = self.module.structs.len();
        let out = f(self);
        self.func.builder.rewind(checkpoint);
        self.bag.rollback(mark);
        self.types = types;
        self.func.scope = scope;
        self.symbols.rollback_instances(instances);
        self.pending.truncate(pending);
        for layout in self.module.structs.drain(layouts..) {
            self.laid_out.remove(&layout.name);
        }
        out
    }

    // Emission

    pub(crate) fn emit(&mut self, kind: InstructionKind, ty: MirType, operand: Operand) {
        self.func.builder.emit(kind, ty, operand);
    }

    pub(crate) fn emit_instruction(&mut self, instr: Instruction) {
        self.func.builder.emit(instr.kind, instr.ty, instr.operand);
    }

    /// Emit `JumpConditional` on the bool on top of the stack.
    pub(crate) fn emit_branch(&mut self, then: u32, otherwise: u32) {
        self.emit(
            InstructionKind::JumpConditional,
            MirType::Void,
            Operand::Branch { then, otherwise },
        );
    }

    // Scopes

    pub(crate) fn enter_scope(&mut self) -> Scope {
        let child = self.func.scope.child();
        std::mem::replace(&mut self.func.scope, child)
    }

    pub(crate) fn leave_scope(&mut self, parent: Scope) {
        let hidden = self.func.scope.hidden.take();
        self.func.scope = parent;
        self.func.scope.hidden = hidden;
    }

    /// Bind a local in the current scope, reporting E2010 on a clash.
    pub(crate) fn bind_local(&mut self, name: &Ident, local: Local) {
        if !self.func.scope.declare(&name.name, local) {
            self.bag.error(
                ErrorCode::E2010,
                name.pos,
                format!("'{}' is already declared", name.name),
            );
        }
    }

    /// Allocate a slot for `ty` and bind `name` to it.
    pub(crate) fn declare_local(&mut self, name: &Ident, ty: Type, is_const: bool) -> Local {
        let mir = self.mir_type(&ty);
        let slot = self.func.builder.declare_local(mir, !is_const);
        let local = Local { slot, ty, is_const };
        self.bind_local(name, local.clone());
        local
    }

    // MIR types

    pub(crate) fn mir_type(&mut self, ty: &Type) -> MirType {
        let ty = self.types.resolve(ty);
        match &ty.kind {
            TypeKind::Void | TypeKind::Undefined => MirType::Void,
            TypeKind::Bool => MirType::BOOL,
            TypeKind::Char => MirType::U8,
            TypeKind::Int(width) => MirType::Int {
                bits: width.bits(),
                signed: width.is_signed(),
            },
            TypeKind::Float(width) => MirType::Float { bits: width.bits() },
            TypeKind::Str | TypeKind::Unknown => MirType::pointer(MirType::U8),
            TypeKind::Pointer | TypeKind::Reference | TypeKind::Array => {
                let base = match ty.base() {
                    Some(base) => self.mir_type(base),
                    None => MirType::U8,
                };
                MirType::pointer(base)
            }
            TypeKind::Struct(id) => self.layout_struct(*id),
            TypeKind::Enum(id) => {
                let base = self.symbols.get_enum(*id).base.clone();
                self.mir_type(&base)
            }
            TypeKind::Option | TypeKind::Tuple | TypeKind::EnumError | TypeKind::Variant(_) => {
                self.layout_aggregate(&ty)
            }
            TypeKind::Generic(name) => match self.func.env.get(name).cloned() {
                Some(substituted) => self.mir_type(&substituted),
                None => MirType::Void,
            },
            // Never solved: nothing constrained it, so it is the default int.
            TypeKind::Auto(_) => MirType::I32,
        }
    }

    fn layout_struct(&mut self, id: StructId) -> MirType {
        self.resolve_struct(id);
        let name = self.symbols.get_struct(id).name.clone();
        if self.laid_out.insert(name.clone()) {
            let field_types: Vec<Type> = self
                .symbols
                .get_struct(id)
                .fields
                .iter()
                .map(|field| field.ty.clone())
                .collect();
            let fields = field_types.iter().map(|ty| self.mir_type(ty)).collect();
            self.module.define_struct(MirStruct {
                name: name.clone(),
                fields,
            });
        }
        MirType::Struct(name)
    }

    /// `?T`, tuples, `E!S` and variants become named structs: a tag
    /// followed by the members.
    fn layout_aggregate(&mut self, ty: &Type) -> MirType {
        let name = self.show(ty);
        if self.laid_out.insert(name.clone()) {
            let fields = match &ty.kind {
                TypeKind::Option => {
                    let base = match ty.base() {
                        Some(base) => self.mir_type(base),
                        None => MirType::Void,
                    };
                    vec![MirType::BOOL, base]
                }
                TypeKind::EnumError => {
                    let mut fields = vec![MirType::BOOL];
                    for member in &ty.payload {
                        fields.push(self.mir_type(member));
                    }
                    fields
                }
                TypeKind::Variant(id) => {
                    self.resolve_variant(*id);
                    let largest = self.largest_member(*id);
                    let payload = match largest {
                        Some(member) => self.mir_type(&member),
                        None => MirType::Void,
                    };
                    vec![MirType::U8, payload]
                }
                _ => ty.payload.iter().map(|member| self.mir_type(member)).collect(),
            };
            self.module.define_struct(MirStruct {
                name: name.clone(),
                fields,
            });
        }
        MirType::Struct(name)
    }

    fn largest_member(&self, id: VariantId) -> Option<Type> {
        let bytes = self.config.pointer_width.bytes();
        self.symbols
            .variant(id)
            .members
            .iter()
            .max_by_key(|member| self.symbols.size_of(member, bytes).unwrap_or(0))
            .cloned()
    }
}
