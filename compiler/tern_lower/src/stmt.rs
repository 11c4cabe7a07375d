//! Blocks and statements.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{Block, Expr, ExprKind, ForLoop, PostfixOp, PrefixOp, Stmt, StmtKind, VarDecl};
use tern_ir::Pos;
use tern_mir::{InstructionKind, Operand};
use tern_stack::ensure_sufficient_stack;
use tern_types::{Type, TypeKind};

use crate::builtins::Builtin;
use crate::lowerer::{Lowerer, LoopTargets};
use crate::ops::Step;
use crate::scope::Local;

/// Expressions that may stand anywhere in a block. Any other expression
/// computes a value and is only allowed as the last statement.
fn is_complete(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Assignment { .. }
        | ExprKind::Call(_)
        | ExprKind::Conditional(_)
        | ExprKind::Switch { .. }
        | ExprKind::Block(_)
        | ExprKind::Postfix { .. }
        | ExprKind::Prefix {
            op: PrefixOp::Increment | PrefixOp::Decrement,
            ..
        }
        | ExprKind::Bad => true,
        ExprKind::Try(inner) => is_complete(inner),
        _ => false,
    }
}

impl Lowerer<'_> {
    pub(crate) fn lower_block(&mut self, block: &Block) {
        ensure_sufficient_stack(|| self.lower_block_inner(block));
    }

    fn lower_block_inner(&mut self, block: &Block) {
        let in_function_block = self.func.scope.in_function_block;
        let parent = self.enter_scope();
        let count = block.stmts.len();
        for (i, stmt) in block.stmts.iter().enumerate() {
            if self.func.builder.is_terminated() {
                let block = self.func.builder.new_block("unreachable");
                self.func.builder.position_at(block);
            }
            if i + 1 == count {
                self.lower_tail(stmt, in_function_block);
            } else {
                self.lower_stmt(stmt);
            }
        }
        self.leave_scope(parent);
    }

    /// The last statement of a block gives the block its value.
    fn lower_tail(&mut self, stmt: &Stmt, in_function_block: bool) {
        let StmtKind::Expr(expr) = &stmt.kind else {
            self.lower_stmt(stmt);
            return;
        };
        let context = self.context();
        if context.is_void() {
            if in_function_block && !is_complete(expr) {
                self.lower_void_tail(expr);
            } else {
                self.lower_expr_stmt(expr);
            }
            return;
        }
        let ty = self.lower_value(expr, context.clone());
        let ty = self.check(&context, &ty, expr.pos);
        if in_function_block {
            let ret = self.func.builder.ret().clone();
            self.emit(InstructionKind::Return, ret, Operand::None);
        } else {
            self.store_hidden(ty, expr.pos);
        }
    }

    /// A value left at the end of a function returning nothing.
    fn lower_void_tail(&mut self, expr: &Expr) {
        let ty = self.lower_value(expr, Type::undefined());
        self.check(&Type::void(), &ty, expr.pos);
        let ty = self.types.resolve(&ty);
        if !ty.is_void() && !ty.is_undefined() {
            let mir = self.mir_type(&ty);
            self.emit(InstructionKind::Pop, mir, Operand::None);
        }
    }

    /// Store the value on the stack into the hidden slot, creating it on
    /// first use. Every branch must store the same type.
    fn store_hidden(&mut self, ty: Type, pos: Pos) {
        let local = match self.func.scope.hidden.clone() {
            Some(local) => {
                self.check(&local.ty, &ty, pos);
                local
            }
            None => {
                let mir = self.mir_type(&ty);
                let slot = self.func.builder.declare_local(mir, true);
                let local = Local {
                    slot,
                    ty,
                    is_const: false,
                };
                self.func.scope.hidden = Some(local.clone());
                local
            }
        };
        let mir = self.mir_type(&local.ty);
        self.emit(InstructionKind::StoreLocal, mir, Operand::Local(local.slot));
    }

    fn lower_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Var(decl) => self.lower_var(decl),
            StmtKind::Return(value) => self.lower_return(value.as_ref(), stmt.pos),
            StmtKind::For(head) => self.lower_for(head),
            StmtKind::Break | StmtKind::Continue => {
                let is_break = matches!(stmt.kind, StmtKind::Break);
                let Some(targets) = self.func.loops.last().copied() else {
                    let keyword = if is_break { "break" } else { "continue" };
                    self.bag.error(
                        ErrorCode::E2034,
                        stmt.pos,
                        format!("'{keyword}' outside of a loop"),
                    );
                    return;
                };
                let target = if is_break {
                    targets.exit_block
                } else {
                    targets.continue_block
                };
                self.func.builder.emit_jump(target);
            }
            StmtKind::Expr(expr) => {
                if is_complete(expr) {
                    self.lower_expr_stmt(expr);
                } else {
                    self.bag.error(
                        ErrorCode::E2001,
                        expr.pos,
                        "expression evaluable only when last of a block",
                    );
                }
            }
            StmtKind::Bad => {}
        }
    }

    /// Lower an expression for its effects, discarding any value.
    fn lower_expr_stmt(&mut self, expr: &Expr) {
        let ty = self.with_context(Type::void(), |this| match &expr.kind {
            ExprKind::Assignment { op, target, value } => {
                this.lower_assignment(*op, target, value, expr.pos);
                Type::void()
            }
            ExprKind::Postfix { op, expr: target } => {
                this.lower_step(target, *op == PostfixOp::Increment, Step::Statement, expr.pos)
            }
            _ => this.lower_expr(expr),
        });
        let ty = self.types.resolve(&ty);
        if ty.is_void() || ty.is_undefined() {
            return;
        }
        if self.is_value_builtin_call(expr) {
            self.bag.warning(
                ErrorCode::W2003,
                expr.pos,
                "useless call to builtin function",
            );
        }
        let mir = self.mir_type(&ty);
        self.emit(InstructionKind::Pop, mir, Operand::None);
    }

    /// A call to a builtin whose only effect is its value.
    fn is_value_builtin_call(&self, expr: &Expr) -> bool {
        let ExprKind::Call(call) = &expr.kind else {
            return false;
        };
        let ExprKind::Identifier(name) = &call.callee.kind else {
            return false;
        };
        self.symbols.overloads(name).is_empty()
            && Builtin::from_name(name).is_some_and(|builtin| builtin != Builtin::Exit)
    }

    fn lower_var(&mut self, decl: &VarDecl) {
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
        let ty = match &decl.value {
            Some(value) => {
                let ty = self.lower_value(value, declared.clone());
                self.check(&declared, &ty, value.pos)
            }
            None => {
                self.emit_default(&declared);
                declared
            }
        };
        let ty = self.types.resolve(&ty);
        let ty = if ty.as_auto().is_some() {
            Type::undefined()
        } else {
            ty
        };
        let local = self.declare_local(&decl.name, ty, decl.is_const);
        let mir = self.mir_type(&local.ty);
        self.emit(InstructionKind::StoreLocal, mir, Operand::Local(local.slot));
    }

    /// Push the zero value of `ty`.
    fn emit_default(&mut self, ty: &Type) {
        let ty = self.types.resolve(ty);
        let operand = match ty.kind {
            TypeKind::Int(_) | TypeKind::Bool | TypeKind::Char => Operand::Int(0),
            TypeKind::Float(_) => Operand::Float(0f64.to_bits()),
            TypeKind::Str => Operand::Str(String::new()),
            TypeKind::Enum(id) => {
                let base = self.symbols.get_enum(id).base.clone();
                self.emit_default(&base);
                return;
            }
            _ => {
                let mir = self.mir_type(&ty);
                self.emit(InstructionKind::LoadZeroinitialized, mir, Operand::None);
                return;
            }
        };
        let mir = self.mir_type(&ty);
        self.emit(InstructionKind::LoadConstant, mir, operand);
    }

    fn lower_return(&mut self, value: Option<&Expr>, pos: Pos) {
        let ret = self.func.ret.clone();
        match value {
            Some(value) => {
                let ty = self.lower_value(value, ret.clone());
                self.check(&ret, &ty, value.pos);
            }
            None => {
                self.check(&ret, &Type::void(), pos);
            }
        }
        let mir = self.func.builder.ret().clone();
        self.emit(InstructionKind::Return, mir, Operand::None);
    }

    /// `for init, cond, step { body }`
    fn lower_for(&mut self, head: &ForLoop) {
        let parent = self.enter_scope();
        if let Some(init) = &head.init {
            self.lower_stmt(init);
        }
        let cond = self.func.builder.new_block("cond");
        let body = self.func.builder.new_block("body");
        let step = head
            .step
            .as_ref()
            .map(|_| self.func.builder.new_block("step"));
        let end = self.func.builder.new_block("end");
        self.func.builder.emit_jump(cond);

        self.func.builder.position_at(cond);
        match &head.condition {
            Some(condition) => {
                self.lower_condition(condition);
                self.emit_branch(body, end);
            }
            None => self.func.builder.emit_jump(body),
        }

        self.func.builder.position_at(body);
        self.lower_loop_body(
            &head.body,
            LoopTargets {
                continue_block: step.unwrap_or(cond),
                exit_block: end,
            },
        );
        if let (Some(block), Some(stmt)) = (step, &head.step) {
            self.func.builder.emit_jump(block);
            self.func.builder.position_at(block);
            self.lower_stmt(stmt);
        }
        self.func.builder.emit_jump(cond);
        self.func.builder.position_at(end);
        self.leave_scope(parent);
    }
}
