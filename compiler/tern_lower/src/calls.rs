//! Calls and overload resolution.
//!
//! Candidates are filtered by arity and generic count. With several
//! candidates left, each is tried speculatively: a template is instantiated
//! and every argument lowered against the candidate's parameters, then
//! all of it is rolled back. The first candidate accepting every argument
//! wins. Only the winner is instantiated and its arguments lowered for
//! real.

use smallvec::SmallVec;
use tern_diagnostic::ErrorCode;
use tern_ir::ast::{Call, Expr, ExprKind, Ident, Modifier};
use tern_ir::Pos;
use tern_mir::{InstructionKind, Operand};
use tern_types::{FunctionId, Instance, Signature, Symbol, Type, TypeKind};
use tracing::trace;

use crate::builtins::Builtin;
use crate::lowerer::{Lowerer, PendingBody};

/// A callable overload with its concrete signature.
#[derive(Clone, Debug)]
struct Candidate {
    id: FunctionId,
    /// Lowered name of the target.
    name: String,
    signature: Signature,
}

impl Lowerer<'_> {
    pub(crate) fn lower_call(&mut self, call: &Call, pos: Pos) -> Type {
        if let Some(catch) = &call.catch {
            self.unsupported("a 'catch' clause", catch.pos);
        }
        match &call.callee.kind {
            ExprKind::Identifier(name) => self.lower_named_call(name, call, pos),
            ExprKind::Member { base, member } => self.lower_method_call(base, member, call, pos),
            _ => {
                self.bag.error(
                    ErrorCode::E2024,
                    call.callee.pos,
                    "expression is not a function",
                );
                Type::undefined()
            }
        }
    }

    fn lower_named_call(&mut self, name: &str, call: &Call, pos: Pos) -> Type {
        let overloads = self.symbols.overloads(name).to_vec();
        if overloads.is_empty() {
            if let Some(builtin) = Builtin::from_name(name) {
                return self.lower_builtin(builtin, call, pos);
            }
            self.bag.error(
                ErrorCode::E2024,
                call.callee.pos,
                format!("undeclared function '{name}'"),
            );
            return Type::undefined();
        }
        if name == self.config.entry_point {
            self.bag.error(
                ErrorCode::E2025,
                call.callee.pos,
                "the entrypoint cannot be called",
            );
            return Type::undefined();
        }
        self.lower_overloaded(name, &overloads, None, call, pos)
    }

    /// `Type.method(...)` or `value.method(...)`.
    fn lower_method_call(&mut self, base: &Expr, member: &Ident, call: &Call, pos: Pos) -> Type {
        if let ExprKind::Identifier(name) = &base.kind {
            if self.func.scope.get(name).is_none() {
                if let Some(Symbol::Struct(id)) = self.symbols.lookup(name) {
                    let id = *id;
                    if self.symbols.get_struct(id).is_template() {
                        self.unsupported("a static call on a generic type", base.pos);
                        return Type::undefined();
                    }
                    let methods: Vec<FunctionId> = self.symbols.methods(id, &member.name).collect();
                    let display = format!("{name}.{}", member.name);
                    if methods.is_empty() {
                        self.bag.error(
                            ErrorCode::E2024,
                            member.pos,
                            format!("undeclared function '{display}'"),
                        );
                        return Type::undefined();
                    }
                    return self.lower_overloaded(&display, &methods, None, call, pos);
                }
            }
        }

        let receiver = self.lower_value(base, Type::undefined());
        let Some(id) = self.struct_of(&receiver) else {
            if !receiver.is_undefined() {
                let message = format!(
                    "member access needs a struct, got '{}'",
                    self.show(&receiver)
                );
                self.bag.error(ErrorCode::E2023, member.pos, message);
            }
            return Type::undefined();
        };
        self.resolve_struct(id);
        let display = format!("{}.{}", self.symbols.get_struct(id).name, member.name);
        let methods: Vec<FunctionId> = self.symbols.methods(id, &member.name).collect();
        if methods.is_empty() {
            self.bag.error(
                ErrorCode::E2024,
                member.pos,
                format!("undeclared function '{display}'"),
            );
            return Type::undefined();
        }
        self.lower_overloaded(&display, &methods, Some(receiver), call, pos)
    }

    fn lower_overloaded(
        &mut self,
        display: &str,
        overloads: &[FunctionId],
        receiver: Option<Type>,
        call: &Call,
        pos: Pos,
    ) -> Type {
        let generic_args: Vec<Type> = call
            .generics
            .iter()
            .map(|node| {
                let ty = self.resolve_type(node);
                self.types.resolve(&ty)
            })
            .collect();
        let arity = call.args.len() + usize::from(receiver.is_some());

        let mut viable: SmallVec<[FunctionId; 4]> = SmallVec::new();
        let mut generic_mismatch = None;
        for &id in overloads {
            let entry = self.symbols.function(id);
            if entry.decl.params.len() != arity {
                continue;
            }
            let generics = entry.decl.generics.len();
            if generics != generic_args.len() {
                generic_mismatch = Some(generics);
                continue;
            }
            viable.push(id);
        }

        let id = match viable.as_slice() {
            [] => {
                if let Some(expected) = generic_mismatch {
                    let message = format!(
                        "function '{display}' expects {expected} generic argument(s), got {}",
                        generic_args.len()
                    );
                    self.bag.error(ErrorCode::E2027, pos, message);
                } else {
                    self.report_no_overload(display, receiver.as_ref(), &call.args, pos);
                }
                return Type::undefined();
            }
            [id] => *id,
            _ => {
                // A losing template is instantiated only while
                // speculating, so nothing of it survives.
                let winner = viable.iter().copied().find(|&id| {
                    self.speculate(|this| {
                        let candidate = this.candidate(id, &generic_args);
                        this.accepts(&candidate, receiver.as_ref(), &call.args)
                    })
                });
                let Some(id) = winner else {
                    self.report_no_overload(display, receiver.as_ref(), &call.args, pos);
                    return Type::undefined();
                };
                id
            }
        };
        let candidate = self.candidate(id, &generic_args);

        self.check_method_access(&candidate, pos);
        let (fits, shown) = self.lower_arguments(&candidate, receiver.as_ref(), &call.args);
        if !fits {
            self.report_overload_failure(display, &shown, pos);
        }
        let ret = candidate.signature.ret;
        let mir = self.mir_type(&ret);
        self.emit(InstructionKind::Call, mir, Operand::Function(candidate.name));
        ret
    }

    /// Whether `actual` can be passed for `param`, solving autos. A `&S`
    /// parameter also takes an `S`.
    fn argument_fits(&mut self, param: &Type, actual: &Type) -> bool {
        let param = self.types.resolve(param);
        if param.kind == TypeKind::Reference {
            if let Some(base) = param.base() {
                let actual = self.types.resolve(actual);
                if actual.kind != TypeKind::Reference && self.types.unify(base, &actual).is_ok() {
                    return true;
                }
            }
        }
        self.types.unify(&param, actual).is_ok()
    }

    /// Try every argument against `candidate` without keeping anything.
    fn accepts(&mut self, candidate: &Candidate, receiver: Option<&Type>, args: &[Expr]) -> bool {
        let mut params = candidate.signature.params.iter();
        if let Some(receiver) = receiver {
            let Some(first) = params.next() else {
                return false;
            };
            let first = first.clone();
            if !self.speculate(|this| this.argument_fits(&first, receiver)) {
                return false;
            }
        }
        args.iter().zip(params).all(|(arg, param)| {
            self.speculate(|this| {
                let ty = this.lower_value(arg, param.clone());
                this.argument_fits(param, &ty)
            })
        })
    }

    /// Lower the arguments of the chosen candidate. Returns whether all
    /// of them fit, and their type names for a diagnostic.
    fn lower_arguments(
        &mut self,
        candidate: &Candidate,
        receiver: Option<&Type>,
        args: &[Expr],
    ) -> (bool, Vec<String>) {
        let mut fits = true;
        let mut shown = Vec::with_capacity(args.len() + 1);
        let mut params = candidate.signature.params.iter();
        if let Some(receiver) = receiver {
            shown.push(self.show(receiver));
            if let Some(first) = params.next() {
                fits &= self.argument_fits(first, receiver);
            }
        }
        for (arg, param) in args.iter().zip(params) {
            let ty = self.lower_value(arg, param.clone());
            shown.push(self.show(&ty));
            fits &= self.argument_fits(param, &ty);
        }
        (fits, shown)
    }

    fn report_no_overload(
        &mut self,
        display: &str,
        receiver: Option<&Type>,
        args: &[Expr],
        pos: Pos,
    ) {
        let mut shown: Vec<String> = receiver.map(|ty| self.show(ty)).into_iter().collect();
        for arg in args {
            let name = self.speculate(|this| {
                let ty = this.lower_value(arg, Type::undefined());
                this.show(&ty)
            });
            shown.push(name);
        }
        self.report_overload_failure(display, &shown, pos);
    }

    fn report_overload_failure(&mut self, display: &str, shown: &[String], pos: Pos) {
        let message = if shown.is_empty() {
            format!("no overload of function '{display}' accepts no parameters")
        } else {
            let listed: Vec<String> = shown.iter().map(|name| format!("'{name}'")).collect();
            format!(
                "no overload of function '{display}' accepts {} as parameters",
                listed.join(", ")
            )
        };
        self.bag.error(ErrorCode::E2026, pos, message);
    }

    /// Private methods may only be called from the owner's own methods.
    fn check_method_access(&mut self, candidate: &Candidate, pos: Pos) {
        let entry = self.symbols.function(candidate.id);
        let Some(owner) = entry.owner else {
            return;
        };
        if entry.decl.modifier == Modifier::Private && !self.can_access(owner) {
            let message = format!(
                "method '{}' of '{}' is private",
                entry.decl.name.name,
                self.symbols.get_struct(owner).name
            );
            self.bag.error(ErrorCode::E2029, pos, message);
        }
    }

    /// `id` as a call target: itself, or its instance for `args`.
    fn candidate(&mut self, id: FunctionId, args: &[Type]) -> Candidate {
        if args.is_empty() {
            return Candidate {
                id,
                name: self.symbols.function(id).name.clone(),
                signature: self.signature(id),
            };
        }
        self.instantiate_function(id, args)
    }

    /// The instance of a generic function for `args`, created and queued
    /// for lowering on first use.
    fn instantiate_function(&mut self, id: FunctionId, args: &[Type]) -> Candidate {
        let key = self.symbols.instance_key(id, args);
        if let Some(instance) = self.symbols.function_instance(&key) {
            return Candidate {
                id,
                name: instance.name.clone(),
                signature: instance.signature.clone(),
            };
        }
        let env = self.function_env(id, args);
        let signature = self.resolve_signature(id, env.clone());
        let name = format!("{}<{}>", self.symbols.function(id).name, key.args.join(", "));
        trace!(%name, "instantiating function");
        self.symbols.insert_function_instance(
            key,
            Instance {
                name: name.clone(),
                signature: signature.clone(),
            },
        );
        self.pending.push_back(PendingBody {
            id,
            name: name.clone(),
            signature: signature.clone(),
            env,
        });
        Candidate {
            id,
            name,
            signature,
        }
    }
}
