//! Raw scanner for Tern source text.
//!
//! This crate splits text into `(tag, len)` pairs and nothing else. It
//! resolves no keywords, cooks no escapes and reports no diagnostics;
//! the `tern_lexer` crate does that on top of the raw stream.
//!
//! ```
//! use tern_lexer_core::{RawScanner, RawTag, SourceBuffer};
//!
//! let buffer = SourceBuffer::new("x += 1");
//! let mut scanner = RawScanner::new(buffer.cursor());
//! let tags: Vec<RawTag> = std::iter::from_fn(|| {
//!     let token = scanner.next_token();
//!     (token.tag != RawTag::Eof).then_some(token.tag)
//! })
//! .collect();
//! assert_eq!(
//!     tags,
//!     [RawTag::Ident, RawTag::Whitespace, RawTag::PlusEqual, RawTag::Whitespace, RawTag::Number]
//! );
//! ```

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::RawScanner;
pub use source_buffer::SourceBuffer;
pub use tag::{RawTag, RawToken};
