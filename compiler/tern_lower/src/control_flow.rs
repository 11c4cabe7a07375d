//! `if` chains, `while`, `switch` and block expressions.
//!
//! Used as values, these constructs store each branch's trailing value
//! into the hidden slot of the enclosing scope and load it once the
//! branches rejoin.

use tern_diagnostic::ErrorCode;
use tern_ir::ast::{Block, Conditional, ConditionalKind, Expr, SwitchCase};
use tern_ir::Pos;
use tern_mir::{InstructionKind, Operand};
use tern_types::{Type, TypeKind};

use crate::lowerer::{Lowerer, LoopTargets};
use crate::scope::Local;

impl Lowerer<'_> {
    /// Lower a condition, which must be a `bool`.
    pub(crate) fn lower_condition(&mut self, condition: &Expr) {
        let ty = self.lower_value(condition, Type::bool());
        self.check(&Type::bool(), &ty, condition.pos);
    }

    /// Jump to `target` if the current block is still open. Returns
    /// whether control reaches `target` from here.
    fn jump_to(&mut self, target: u32) -> bool {
        if self.func.builder.is_terminated() {
            return false;
        }
        self.func.builder.emit_jump(target);
        true
    }

    /// Restore the hidden slot of the enclosing scope and load the value
    /// the branches produced.
    fn finish_value(&mut self, outer: Option<Local>, as_value: bool, reached: bool) -> Type {
        let hidden = std::mem::replace(&mut self.func.scope.hidden, outer);
        if !as_value {
            return Type::void();
        }
        match hidden {
            Some(local) if reached => {
                let mir = self.mir_type(&local.ty);
                self.emit(InstructionKind::LoadLocal, mir, Operand::Local(local.slot));
                local.ty
            }
            // Every branch left the function.
            _ if !reached => Type::undefined(),
            _ => Type::void(),
        }
    }

    pub(crate) fn lower_conditional(&mut self, conditional: &Conditional) -> Type {
        if conditional.kind == ConditionalKind::While {
            self.lower_while(conditional);
            return Type::void();
        }
        let as_value = !self.context().is_void();
        if as_value && !conditional.is_exhaustive() {
            self.bag.error(
                ErrorCode::E2003,
                conditional.pos,
                "'if' used as a value needs an 'else'",
            );
        }
        let outer = self.func.scope.hidden.take();
        let (end, reached) = self.lower_if_link(conditional, None);
        self.func.builder.position_at(end);
        self.finish_value(outer, as_value, reached)
    }

    /// One `if`/`elif` test with its branch; the chain continues in the
    /// `else` block.
    fn lower_if_link(&mut self, link: &Conditional, end: Option<u32>) -> (u32, bool) {
        if let Some(condition) = &link.condition {
            self.lower_condition(condition);
        }
        let then = self.func.builder.new_block("then");
        let otherwise = link
            .else_node
            .as_ref()
            .map(|_| self.func.builder.new_block("else"));
        let end = end.unwrap_or_else(|| self.func.builder.new_block("end"));
        self.emit_branch(then, otherwise.unwrap_or(end));

        let mut reached = otherwise.is_none();
        self.func.builder.position_at(then);
        self.lower_block(&link.body);
        reached |= self.jump_to(end);

        if let (Some(block), Some(next)) = (otherwise, &link.else_node) {
            self.func.builder.position_at(block);
            if next.kind == ConditionalKind::Else {
                self.lower_block(&next.body);
                reached |= self.jump_to(end);
            } else {
                let (_, next_reached) = self.lower_if_link(next, Some(end));
                reached |= next_reached;
            }
        }
        (end, reached)
    }

    fn lower_while(&mut self, conditional: &Conditional) {
        let head = self.func.builder.new_block("cond");
        let body = self.func.builder.new_block("body");
        let end = self.func.builder.new_block("end");
        self.func.builder.emit_jump(head);

        self.func.builder.position_at(head);
        match &conditional.condition {
            Some(condition) => {
                self.lower_condition(condition);
                self.emit_branch(body, end);
            }
            None => self.func.builder.emit_jump(body),
        }

        self.func.builder.position_at(body);
        self.lower_loop_body(
            &conditional.body,
            LoopTargets {
                continue_block: head,
                exit_block: end,
            },
        );
        self.func.builder.emit_jump(head);
        self.func.builder.position_at(end);
    }

    /// Lower a loop body for its effects with `break`/`continue` bound.
    pub(crate) fn lower_loop_body(&mut self, body: &Block, targets: LoopTargets) {
        self.func.loops.push(targets);
        let outer = self.func.scope.hidden.take();
        self.with_context(Type::void(), |this| this.lower_block(body));
        self.func.scope.hidden = outer;
        self.func.loops.pop();
    }

    pub(crate) fn lower_switch(
        &mut self,
        scrutinee: &Expr,
        cases: &[SwitchCase],
        default: Option<&Block>,
        pos: Pos,
    ) -> Type {
        let as_value = !self.context().is_void();
        let ty = self.lower_value(scrutinee, Type::undefined());
        if !(self.casts_to_int(&ty) || ty.is_undefined()) {
            let message = format!("cannot switch on values of type '{}'", self.show(&ty));
            self.bag.error(ErrorCode::E2035, scrutinee.pos, message);
        }
        if as_value && default.is_none() {
            self.bag.error(
                ErrorCode::E2003,
                pos,
                "'switch' used as a value needs an 'else'",
            );
        }
        let mir = self.mir_type(&ty);
        let slot = self.func.builder.declare_local(mir.clone(), false);
        self.emit(InstructionKind::StoreLocal, mir.clone(), Operand::Local(slot));

        let outer = self.func.scope.hidden.take();
        let end = self.func.builder.new_block("end");
        let mut reached = default.is_none();
        for case in cases {
            let body = self.func.builder.new_block("case");
            let next = self.func.builder.new_block("next");
            self.emit(InstructionKind::LoadLocal, mir.clone(), Operand::Local(slot));
            let value_ty = self.lower_value(&case.value, ty.clone());
            self.check(&ty, &value_ty, case.value.pos);
            let compared = if ty.kind == TypeKind::Undefined {
                self.mir_type(&value_ty)
            } else {
                mir.clone()
            };
            self.emit(InstructionKind::Ceq, compared, Operand::None);
            self.emit_branch(body, next);

            self.func.builder.position_at(body);
            self.lower_block(&case.body);
            reached |= self.jump_to(end);
            self.func.builder.position_at(next);
        }
        match default {
            Some(block) => {
                self.lower_block(block);
                reached |= self.jump_to(end);
            }
            None => {
                self.jump_to(end);
            }
        }
        self.func.builder.position_at(end);
        self.finish_value(outer, as_value, reached)
    }

    /// `{ ... }` as an expression: its trailing value, if any.
    pub(crate) fn lower_block_value(&mut self, block: &Block) -> Type {
        let as_value = !self.context().is_void();
        let outer = self.func.scope.hidden.take();
        self.lower_block(block);
        let reached = !self.func.builder.is_terminated();
        self.finish_value(outer, as_value, reached)
    }
}
