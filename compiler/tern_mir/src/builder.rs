//! Incremental construction of a [`MirFunction`].
//!
//! Position at a block, emit instructions, move on. The builder also
//! supports inserting at an earlier mark, for constant operands that must
//! precede an already-lowered operand. [`FunctionBuilder::checkpoint`] /
//! [`FunctionBuilder::rewind`] discard everything emitted while
//! type-checking speculatively.

use crate::{Instruction, InstructionKind, MirBlock, MirFunction, MirLocal, MirType, Operand};

/// A position in the current block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InsertMark {
    block: usize,
    index: usize,
}

/// Builder state to return to with [`FunctionBuilder::rewind`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuilderCheckpoint {
    mark: InsertMark,
    blocks: usize,
    locals: usize,
}

pub struct FunctionBuilder {
    name: String,
    params: Vec<MirType>,
    ret: MirType,
    locals: Vec<MirLocal>,
    blocks: Vec<MirBlock>,
    current: usize,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "block and local counts never approach u32::MAX"
)]
fn to_u32(n: usize) -> u32 {
    n as u32
}

impl FunctionBuilder {
    /// A builder positioned at an empty `entry` block.
    pub fn new(name: impl Into<String>, params: Vec<MirType>, ret: MirType) -> Self {
        FunctionBuilder {
            name: name.into(),
            params,
            ret,
            locals: Vec::new(),
            blocks: vec![MirBlock::new("entry")],
            current: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ret(&self) -> &MirType {
        &self.ret
    }

    // Blocks

    pub fn new_block(&mut self, label: impl Into<String>) -> u32 {
        self.blocks.push(MirBlock::new(label));
        to_u32(self.blocks.len() - 1)
    }

    pub fn position_at(&mut self, block: u32) {
        debug_assert!((block as usize) < self.blocks.len(), "block {block} out of bounds");
        self.current = block as usize;
    }

    pub fn current_block(&self) -> u32 {
        to_u32(self.current)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current].is_terminated()
    }

    // Locals

    pub fn declare_local(&mut self, ty: MirType, mutable: bool) -> u32 {
        self.locals.push(MirLocal { ty, mutable });
        to_u32(self.locals.len() - 1)
    }

    // Instructions

    pub fn emit(&mut self, kind: InstructionKind, ty: MirType, operand: Operand) {
        self.blocks[self.current]
            .instructions
            .push(Instruction::new(kind, ty, operand));
    }

    /// Jump to `target` unless the current block already ended.
    pub fn emit_jump(&mut self, target: u32) {
        if !self.is_terminated() {
            self.emit(InstructionKind::Jump, MirType::Void, Operand::Block(target));
        }
    }

    pub fn mark(&self) -> InsertMark {
        InsertMark {
            block: self.current,
            index: self.blocks[self.current].instructions.len(),
        }
    }

    /// Insert an instruction at `mark`, ahead of everything emitted since.
    pub fn insert_at(&mut self, mark: InsertMark, instr: Instruction) {
        let instructions = &mut self.blocks[mark.block].instructions;
        let index = mark.index.min(instructions.len());
        instructions.insert(index, instr);
    }

    /// Drop everything emitted at `mark` or later in its block.
    pub fn truncate(&mut self, mark: InsertMark) {
        self.blocks[mark.block].instructions.truncate(mark.index);
    }

    pub fn checkpoint(&self) -> BuilderCheckpoint {
        BuilderCheckpoint {
            mark: self.mark(),
            blocks: self.blocks.len(),
            locals: self.locals.len(),
        }
    }

    /// Forget blocks, locals and instructions added since `checkpoint`,
    /// and move back to where it was taken.
    pub fn rewind(&mut self, checkpoint: BuilderCheckpoint) {
        self.blocks.truncate(checkpoint.blocks);
        self.locals.truncate(checkpoint.locals);
        self.current = checkpoint.mark.block;
        self.truncate(checkpoint.mark);
    }

    pub fn finish(self) -> MirFunction {
        MirFunction {
            name: self.name,
            params: self.params,
            ret: self.ret,
            locals: self.locals,
            blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn constant(value: i64) -> Instruction {
        Instruction::new(InstructionKind::LoadConstant, MirType::I32, Operand::Int(value))
    }

    #[test]
    fn test_insert_before_emitted_operand() {
        let mut builder = FunctionBuilder::new("f", Vec::new(), MirType::I32);
        let mark = builder.mark();
        builder.emit(InstructionKind::LoadLocal, MirType::I32, Operand::Local(0));
        builder.insert_at(mark, constant(2));
        let func = builder.finish();
        let kinds: Vec<_> = func.instructions().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![InstructionKind::LoadConstant, InstructionKind::LoadLocal]
        );
    }

    #[test]
    fn test_rewind_discards_speculative_work() {
        let mut builder = FunctionBuilder::new("f", Vec::new(), MirType::Void);
        builder.emit(InstructionKind::LoadLocal, MirType::I32, Operand::Local(0));
        let checkpoint = builder.checkpoint();

        builder.declare_local(MirType::I32, true);
        builder.emit(InstructionKind::Pop, MirType::I32, Operand::None);
        let block = builder.new_block("then");
        builder.position_at(block);
        builder.emit(InstructionKind::Return, MirType::Void, Operand::None);

        builder.rewind(checkpoint);
        assert_eq!(builder.current_block(), 0);
        assert_eq!(builder.block_count(), 1);
        let func = builder.finish();
        assert!(func.locals.is_empty());
        assert_eq!(func.instructions().count(), 1);
    }

    #[test]
    fn test_jump_after_terminator_is_skipped() {
        let mut builder = FunctionBuilder::new("f", Vec::new(), MirType::Void);
        builder.emit(InstructionKind::Return, MirType::Void, Operand::None);
        builder.emit_jump(1);
        assert!(builder.is_terminated());
        assert_eq!(builder.finish().instructions().count(), 1);
    }
}
