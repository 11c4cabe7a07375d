//! Lowering from the Tern AST to MIR.
//!
//! [`generate`] type-checks a [`Namespace`] while it lowers it: there is
//! no separate checking pass. Problems go to the [`DiagnosticBag`] and the
//! offending expression gets a best-guess type, so one run reports as many
//! errors as possible. Only a missing entry point and the final checkpoint
//! abort.
//!
//! # Architecture
//!
//! - [`declare`] indexes every member into the [`SymbolTable`].
//! - `Lowerer` (in `lowerer.rs`) owns the module being built and the
//!   state of the function currently being lowered.
//! - `Scope` (in `scope.rs`) maps names to local slots. Child scopes are
//!   clones of their parent.
//! - Expressions, statements, calls, control flow and allocation each
//!   live in their own module and extend `Lowerer`.
//!
//! Generic templates are never lowered directly. Each distinct
//! instantiation is queued and lowered once, under a name such as
//! `max<i32>`.

mod alloc;
mod builtins;
mod calls;
mod control_flow;
mod decl;
mod expr;
mod fold;
mod lowerer;
mod ops;
mod resolve;
mod scope;
mod stmt;

use tern_diagnostic::{Aborted, DiagnosticBag};
use tern_ir::ast::Namespace;
use tern_mir::MirModule;
use tern_types::SymbolTable;
use tracing::debug;

pub use decl::declare;

use lowerer::Lowerer;

/// Target pointer width. Only `size<T>()` depends on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PointerWidth {
    Bits32,
    #[default]
    Bits64,
}

impl PointerWidth {
    pub const fn bytes(self) -> u64 {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LowerConfig {
    pub pointer_width: PointerWidth,
    /// Name of the function execution starts at.
    pub entry_point: String,
    /// Report a missing entry point. Off for library units.
    pub expect_entry_point: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        LowerConfig {
            pointer_width: PointerWidth::default(),
            entry_point: "main".to_owned(),
            expect_entry_point: true,
        }
    }
}

/// Lower `namespace` with the default configuration.
pub fn generate(
    namespace: &Namespace,
    symbols: &mut SymbolTable,
    bag: &mut DiagnosticBag,
) -> Result<MirModule, Aborted> {
    generate_with(namespace, symbols, bag, &LowerConfig::default())
}

/// Declare, type-check and lower every member of `namespace`.
///
/// Fails if the entry point is missing or if any error was reported,
/// including errors from earlier stages still in `bag`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate_with(
    namespace: &Namespace,
    symbols: &mut SymbolTable,
    bag: &mut DiagnosticBag,
    config: &LowerConfig,
) -> Result<MirModule, Aborted> {
    declare(namespace, symbols, bag);
    let mut lowerer = Lowerer::new(symbols, bag, config);
    lowerer.resolve_declarations();
    lowerer.lower_items();
    lowerer.check_entry_point()?;
    let module = lowerer.finish();
    bag.checkpoint()?;
    debug!(
        functions = module.functions.len(),
        structs = module.structs.len(),
        "generated MIR"
    );
    Ok(module)
}
