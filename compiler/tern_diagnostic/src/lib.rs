//! Diagnostic reporting for the Tern compiler.
//!
//! Every stage reports problems into a [`DiagnosticBag`] instead of
//! failing. A stage only stops early by returning [`Aborted`], which is
//! produced at a handful of checkpoints (end of lexing, end of parsing,
//! unexpected EOF, missing entry point, end of lowering).

mod bag;
mod diagnostic;
mod error_code;
mod line_index;

pub use bag::{Aborted, BagMark, DiagnosticBag, DiagnosticConfig};
pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use line_index::LineIndex;
