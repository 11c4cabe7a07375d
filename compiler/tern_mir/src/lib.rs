//! Tern MIR: the typed stack-machine IR produced by lowering.
//!
//! A [`MirModule`] holds function bodies, extern prototypes and struct
//! layouts. Each function is a list of labelled basic blocks of
//! [`Instruction`]s that push to and pop from an evaluation stack.
//!
//! Two dumps are available: `Display` gives the lossless text form and
//! [`dump_json`] the structured tree.

mod builder;
mod instr;
mod module;
mod ty;

pub use builder::{BuilderCheckpoint, FunctionBuilder, InsertMark};
pub use instr::{Instruction, InstructionKind, Operand};
pub use module::{MirBlock, MirFunction, MirLocal, MirModule, MirPrototype, MirStruct};
pub use ty::MirType;

/// The module as a JSON tree.
pub fn dump_json(module: &MirModule) -> serde_json::Value {
    // Only string-keyed maps and finite numbers reach the serializer.
    serde_json::to_value(module).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests;
