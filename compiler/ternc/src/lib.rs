//! The Tern compiler driver.
//!
//! A [`Session`] owns everything one compilation needs: the sources, the
//! diagnostic bag and the symbol table. [`compile`] runs a session over a
//! set of sources, and [`compile_all`] runs independent units in parallel.
//!
//! # Pipeline
//!
//! 1. Tokenize every source, then stop if any lexical error was reported.
//! 2. Parse every token stream into one namespace, then stop on errors.
//! 3. Declare, type-check and lower the namespace to a [`MirModule`].

mod error;
mod session;
mod tracing_setup;

pub use error::CompileError;
pub use session::{compile, compile_all, compile_with, Session, SessionConfig};
pub use tracing_setup::init_tracing;

pub use tern_mir::MirModule;
