//! Functions, blocks and the module that owns them.
//!
//! The `Display` impls produce the text dump:
//!
//! ```text
//! .strct Point:
//!   .fields
//!     i32
//!     i32
//!
//! .fn exit(i32) void
//!
//! .fn main() void:
//!   .locals:
//!     .[0] {mutable} %Point
//!
//!  [0] % entry:
//!   LoadZeroinitialized %Point (_)
//!   StoreLocal %Point (0)
//!   Return void (_)
//! ```

use std::fmt;

use serde::Serialize;

use crate::{Instruction, MirType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MirBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
}

impl MirBlock {
    pub fn new(label: impl Into<String>) -> Self {
        MirBlock {
            label: label.into(),
            instructions: Vec::new(),
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.instructions
            .last()
            .is_some_and(|instr| instr.kind.is_terminator())
    }
}

impl fmt::Display for MirBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.label)?;
        for instr in &self.instructions {
            write!(f, "\n  {instr}")?;
        }
        Ok(())
    }
}

/// A stack slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MirLocal {
    pub ty: MirType,
    pub mutable: bool,
}

impl fmt::Display for MirLocal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = if self.mutable { "mutable" } else { "immutable" };
        write!(f, "{{{attr}}} {}", self.ty)
    }
}

/// A function without a body, declared for external linkage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MirPrototype {
    pub name: String,
    pub params: Vec<MirType>,
    pub ret: MirType,
}

fn write_signature(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    params: &[MirType],
    ret: &MirType,
) -> fmt::Result {
    write!(f, ".fn {name}(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }
    write!(f, ") {ret}")
}

impl fmt::Display for MirPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_signature(f, &self.name, &self.params, &self.ret)
    }
}

/// A function body. Parameters occupy locals `0..params.len()`, and the
/// first block is the entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MirFunction {
    pub name: String,
    pub params: Vec<MirType>,
    pub ret: MirType,
    pub locals: Vec<MirLocal>,
    pub blocks: Vec<MirBlock>,
}

impl MirFunction {
    /// Every instruction, block by block.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|block| &block.instructions)
    }
}

impl fmt::Display for MirFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_signature(f, &self.name, &self.params, &self.ret)?;
        f.write_str(":\n  .locals:")?;
        if self.locals.is_empty() {
            f.write_str("\n    .empty")?;
        }
        for (i, local) in self.locals.iter().enumerate() {
            write!(f, "\n    .[{i}] {local}")?;
        }
        f.write_str("\n")?;
        for (i, block) in self.blocks.iter().enumerate() {
            write!(f, "\n [{i}] % {block}\n")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MirStruct {
    pub name: String,
    pub fields: Vec<MirType>,
}

impl fmt::Display for MirStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".strct {}:\n  .fields", self.name)?;
        if self.fields.is_empty() {
            f.write_str("\n    .empty")?;
        }
        for field in &self.fields {
            write!(f, "\n    {field}")?;
        }
        Ok(())
    }
}

/// One lowered compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MirModule {
    pub functions: Vec<MirFunction>,
    pub prototypes: Vec<MirPrototype>,
    pub structs: Vec<MirStruct>,
}

impl MirModule {
    pub fn new() -> Self {
        MirModule::default()
    }

    pub fn function(&self, name: &str) -> Option<&MirFunction> {
        self.functions.iter().find(|func| func.name == name)
    }

    /// Add a prototype unless one with the same name exists.
    pub fn declare_prototype(&mut self, prototype: MirPrototype) {
        if !self.prototypes.iter().any(|p| p.name == prototype.name) {
            self.prototypes.push(prototype);
        }
    }

    /// Add a struct layout unless one with the same name exists.
    pub fn define_struct(&mut self, layout: MirStruct) {
        if !self.structs.iter().any(|s| s.name == layout.name) {
            self.structs.push(layout);
        }
    }
}

impl fmt::Display for MirModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for layout in &self.structs {
            writeln!(f, "{layout}\n")?;
        }
        for prototype in &self.prototypes {
            writeln!(f, "{prototype}")?;
        }
        if !self.prototypes.is_empty() {
            writeln!(f)?;
        }
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{function}")?;
        }
        Ok(())
    }
}
