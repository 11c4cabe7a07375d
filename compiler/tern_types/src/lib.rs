//! Type system for Tern.
//!
//! - [`Type`] / [`TypeKind`]: semantic types as plain values
//! - [`TypeTable`]: the `auto` substitution table
//! - [`SymbolTable`]: top-level names, generic templates and their
//!   instantiation caches
//! - [`Constant`]: values known at compile time
//!
//! Nothing here reports diagnostics. The lowerer decides what a failed
//! lookup or a [`Mismatch`] means and reports it.

mod display;
mod flags;
mod layout;
mod symbols;
mod table;
mod ty;
mod value;

pub use display::TypeDisplay;
pub use flags::TypeFlags;
pub use symbols::{
    EnumEntry, Field, FunctionEntry, GlobalEntry, Instance, InstanceKey, InstanceMark, Item,
    Redeclared, Resolution, StructEntry, Signature, Symbol, SymbolTable, VariantEntry,
};
pub use table::{Mismatch, TypeTable};
pub use ty::{
    EnumId, FloatWidth, FunctionId, GlobalId, IntWidth, StructId, Type, TypeKind, TypeVar,
    VariantId,
};
pub use value::Constant;
