//! The declaration walk.
//!
//! Lowering runs in two passes over [`SymbolTable::items`]. The first
//! resolves every type declaration, global and signature, so their
//! diagnostics are reported exactly once and never while speculating.
//! The second lowers function and method bodies in declaration
//! order, draining the instantiation queue after each item.

use tern_diagnostic::{Aborted, Diagnostic, DiagnosticBag, ErrorCode};
use tern_ir::ast::{DirectiveKind, Member, Modifier, Namespace};
use tern_mir::{FunctionBuilder, InstructionKind, MirPrototype, Operand};
use tern_types::{FunctionId, Item, SymbolTable, Type};
use tracing::{debug, trace};

use crate::lowerer::{Env, FnState, Lowerer, PendingBody};

/// Index every member of `namespace` into `symbols`, reporting E2010 for
/// names already taken.
///
/// `import` directives are left to the caller, which supplies the
/// imported files as further sources.
pub fn declare(namespace: &Namespace, symbols: &mut SymbolTable, bag: &mut DiagnosticBag) {
    for member in &namespace.members {
        let (name, declared) = match member {
            Member::Function(decl) => (&decl.name, symbols.declare_function(decl.clone()).is_ok()),
            Member::Struct(decl) => (&decl.name, symbols.declare_struct(decl.clone()).is_ok()),
            Member::Enum(decl) => (&decl.name, symbols.declare_enum(decl.clone()).is_ok()),
            Member::Variant(decl) => (&decl.name, symbols.declare_variant(decl.clone()).is_ok()),
            Member::Global(decl) => (
                &decl.decl.name,
                symbols.declare_global(decl.clone()).is_ok(),
            ),
            Member::Directive(directive) => {
                match &directive.kind {
                    DirectiveKind::Import(path) => trace!(?path, "import left to the caller"),
                    DirectiveKind::Use { .. } => bag.error(
                        ErrorCode::E9002,
                        directive.pos,
                        "'use' directive is not supported by this backend yet",
                    ),
                }
                continue;
            }
        };
        if !declared {
            bag.error(
                ErrorCode::E2010,
                name.pos,
                format!("'{}' is already declared", name.name),
            );
        }
    }
}

impl Lowerer<'_> {
    /// First pass: types, globals and signatures.
    pub(crate) fn resolve_declarations(&mut self) {
        let items = self.symbols.items().to_vec();
        for item in &items {
            match *item {
                Item::Struct(id) => self.resolve_struct(id),
                Item::Enum(id) => self.resolve_enum(id),
                Item::Variant(id) => self.resolve_variant(id),
                Item::Function(_) | Item::Global(_) => {}
            }
        }
        for item in &items {
            if let Item::Global(id) = *item {
                self.resolve_global(id);
            }
        }
        for item in &items {
            match *item {
                Item::Function(id) => {
                    self.signature(id);
                }
                Item::Struct(id) => {
                    for method in self.symbols.get_struct(id).methods.clone() {
                        self.signature(method);
                    }
                }
                _ => {}
            }
        }
        self.check_overload_sets(&items);
    }

    /// Two overloads taking the same parameter types clash.
    fn check_overload_sets(&mut self, items: &[Item]) {
        for item in items {
            let Item::Function(id) = *item else {
                continue;
            };
            let entry = self.symbols.function(id);
            if entry.is_template() {
                continue;
            }
            let name = entry.decl.name.clone();
            let earlier: Vec<FunctionId> = self
                .symbols
                .overloads(&name.name)
                .iter()
                .copied()
                .take_while(|other| *other != id)
                .filter(|other| !self.symbols.function(*other).is_template())
                .collect();
            let params = self.signature(id).params;
            for other in earlier {
                if self.signature(other).params == params {
                    self.bag.error(
                        ErrorCode::E2010,
                        name.pos,
                        format!("'{}' is already declared with the same parameters", name.name),
                    );
                    break;
                }
            }
        }
    }

    /// Second pass: bodies, in declaration order.
    pub(crate) fn lower_items(&mut self) {
        let items = self.symbols.items().to_vec();
        for item in items {
            match item {
                Item::Function(id) => {
                    if !self.symbols.function(id).is_template() {
                        let name = self.symbols.function(id).name.clone();
                        let signature = self.signature(id);
                        self.lower_function(PendingBody {
                            id,
                            name,
                            signature,
                            env: Env::default(),
                        });
                    }
                }
                Item::Struct(id) => {
                    if !self.symbols.get_struct(id).is_template() {
                        self.queue_methods(id);
                    }
                }
                Item::Enum(_) | Item::Variant(_) | Item::Global(_) => {}
            }
            self.drain_pending();
        }
    }

    fn drain_pending(&mut self) {
        while let Some(body) = self.pending.pop_front() {
            self.lower_function(body);
        }
    }

    /// Lower one body, or declare a prototype for a function without one.
    pub(crate) fn lower_function(&mut self, body: PendingBody) {
        let entry = self.symbols.function(body.id);
        let decl = entry.decl.clone();
        let owner = entry.owner;
        let params: Vec<_> = body
            .signature
            .params
            .iter()
            .map(|param| self.mir_type(param))
            .collect();
        let ret = self.mir_type(&body.signature.ret);

        let Some(block) = &decl.body else {
            trace!(name = %body.name, "declaring prototype");
            self.module.declare_prototype(MirPrototype {
                name: body.name,
                params,
                ret,
            });
            return;
        };

        debug!(name = %body.name, "lowering function");
        let builder = FunctionBuilder::new(body.name, params, ret.clone());
        let state = FnState::new(builder, body.signature.ret.clone(), body.env, owner);
        let outer = std::mem::replace(&mut self.func, state);

        for (param, ty) in decl.params.iter().zip(&body.signature.params) {
            self.declare_local(&param.name, ty.clone(), true);
        }
        self.func.scope.in_function_block = true;
        let ret_ty = body.signature.ret;
        self.with_context(ret_ty.clone(), |this| this.lower_block(block));

        if !self.func.builder.is_terminated() {
            if ret_ty.is_void() {
                self.emit(InstructionKind::Return, ret, Operand::None);
            } else {
                self.check(&ret_ty, &Type::void(), block.pos);
            }
        }

        let state = std::mem::replace(&mut self.func, outer);
        self.module.functions.push(state.builder.finish());
    }

    /// Check the entry point. Its absence is fatal when one is expected.
    pub(crate) fn check_entry_point(&mut self) -> Result<(), Aborted> {
        let name = self.config.entry_point.clone();
        let overloads = self.symbols.overloads(&name).to_vec();
        let Some(&id) = overloads.first() else {
            if !self.config.expect_entry_point {
                return Ok(());
            }
            self.bag
                .report(Diagnostic::error(ErrorCode::E2020).with_message("missing entrypoint"));
            return Err(Aborted::MissingEntryPoint);
        };

        let decl = self.symbols.function(id).decl.clone();
        let ret = self.signature(id).ret;
        let mut problems = Vec::new();
        if overloads.len() > 1 {
            problems.push("cannot be overloaded");
        }
        if !decl.params.is_empty() {
            problems.push("cannot take parameters");
        }
        if !decl.generics.is_empty() {
            problems.push("cannot be generic");
        }
        if !ret.is_void() && !ret.is_undefined() {
            problems.push("must return 'void'");
        }
        if decl.modifier == Modifier::Public {
            problems.push("cannot be public");
        }
        if decl.body.is_none() {
            problems.push("needs a body");
        }
        for problem in problems {
            self.bag.error(
                ErrorCode::E2021,
                decl.name.pos,
                format!("entrypoint '{name}' {problem}"),
            );
        }
        Ok(())
    }
}
