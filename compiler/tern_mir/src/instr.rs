//! Instructions of the stack machine.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::MirType;

/// What an instruction does. Operands come from the evaluation stack;
/// the [`Operand`] only carries immediates and references.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum InstructionKind {
    // Locals and fields
    LoadLocal,
    StoreLocal,
    LoadField,
    StoreField,

    // Values
    LoadConstant,
    LoadZeroinitialized,
    Duplicate,
    Pop,

    // Calls and returns
    Call,
    Return,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Neg,

    // Comparison
    Ceq,
    Neq,
    Less,
    Greater,
    Leq,
    Geq,

    // Control flow
    Jump,
    JumpConditional,

    // Casts
    CastIntToInt,
}

impl InstructionKind {
    /// Ends a basic block.
    pub fn is_terminator(self) -> bool {
        matches!(
            self,
            InstructionKind::Return | InstructionKind::Jump | InstructionKind::JumpConditional
        )
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[allow(
    clippy::trivially_copy_pass_by_ref,
    reason = "signature required by serialize_with"
)]
fn float_from_bits<S: Serializer>(bits: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(f64::from_bits(*bits))
}

/// Immediate or reference attached to an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Operand {
    None,
    Int(i64),
    /// IEEE-754 bits, so operands stay `Eq`.
    Float(#[serde(serialize_with = "float_from_bits")] u64),
    Str(String),
    /// Local slot.
    Local(u32),
    /// Field index.
    Field(u32),
    /// Callee.
    Function(String),
    /// Jump target.
    Block(u32),
    Branch {
        then: u32,
        otherwise: u32,
    },
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => f.write_str("_"),
            Operand::Int(value) => write!(f, "{value}"),
            Operand::Float(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            Operand::Str(value) => write!(f, "{value:?}"),
            Operand::Local(slot) | Operand::Field(slot) | Operand::Block(slot) => {
                write!(f, "{slot}")
            }
            Operand::Function(name) => f.write_str(name),
            Operand::Branch { then, otherwise } => write!(f, "{then}, {otherwise}"),
        }
    }
}

/// `LoadLocal i32 (0)`: kind, result type, operand.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub ty: MirType,
    pub operand: Operand,
}

impl Instruction {
    pub fn new(kind: InstructionKind, ty: MirType, operand: Operand) -> Self {
        Instruction { kind, ty, operand }
    }

    /// The integer immediate of a `LoadConstant`.
    pub fn constant_int(&self) -> Option<i64> {
        match (self.kind, &self.operand) {
            (InstructionKind::LoadConstant, Operand::Int(value)) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.ty, self.operand)
    }
}
