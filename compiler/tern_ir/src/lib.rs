//! Tern IR - shared front-end data
//!
//! This crate holds the values every compiler stage passes along:
//! - `Source` / `SourceMap` for the texts of a compilation unit
//! - `Span` / `Pos` for locations
//! - `Token` / `TokenKind` for lexer output
//! - the syntax tree in [`ast`], plus a canonical printer
//!
//! Everything here is plain immutable data. No stage mutates what an
//! earlier stage produced.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod source;
mod span;
mod token;

pub use source::{Source, SourceMap};
pub use span::{Pos, SourceId, Span};
pub use token::{Token, TokenKind};
