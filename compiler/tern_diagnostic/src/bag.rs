//! The bag every stage reports into.
//!
//! Features:
//! - Deduplication keyed by `(severity, pos, message)`
//! - An optional error limit; errors past it are only counted
//! - Marks and rollback, used by the parser to discard diagnostics
//!   raised while speculating
//! - Checkpoints that turn accumulated errors into [`Aborted`]

use rustc_hash::FxHashSet;
use tern_ir::Pos;
use tracing::trace;

use crate::{Diagnostic, ErrorCode, Severity};

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Stop recording errors after this many (`None` = unlimited).
    pub error_limit: Option<usize>,
    /// Drop a diagnostic whose severity, position and message were
    /// already reported.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: None,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = Some(limit);
        self
    }
}

/// Why a stage stopped early.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Aborted {
    #[error("aborting due to {count} previous error(s)")]
    PreviousErrors { count: usize },
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("missing entrypoint")]
    MissingEntryPoint,
}

/// Snapshot of a bag's length, restored by [`DiagnosticBag::rollback`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BagMark {
    len: usize,
    errors: usize,
    suppressed: usize,
}

type DedupKey = (Severity, Option<Pos>, String);

/// Insertion-ordered, deduplicated collection of diagnostics.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<DedupKey>,
    errors: usize,
    suppressed: usize,
    config: DiagnosticConfig,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticBag {
            config,
            ..DiagnosticBag::default()
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Record a diagnostic. Returns `false` if it was a duplicate or fell
    /// past the error limit.
    pub fn report(&mut self, diag: Diagnostic) -> bool {
        if diag.is_error() && self.limit_reached() {
            self.suppressed += 1;
            return false;
        }
        if self.config.deduplicate {
            let key = (diag.severity, diag.pos, diag.message.clone());
            if !self.seen.insert(key) {
                return false;
            }
        }
        trace!(code = %diag.code, message = %diag.message, "diagnostic");
        if diag.is_error() {
            self.errors += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Report an error at `pos`.
    pub fn error(&mut self, code: ErrorCode, pos: Pos, message: impl Into<String>) {
        self.report(Diagnostic::error(code).with_message(message).with_pos(pos));
    }

    /// Report a warning at `pos`.
    pub fn warning(&mut self, code: ErrorCode, pos: Pos, message: impl Into<String>) {
        self.report(Diagnostic::warning(code).with_message(message).with_pos(pos));
    }

    /// Report a note at `pos`.
    pub fn note(&mut self, code: ErrorCode, pos: Pos, message: impl Into<String>) {
        self.report(Diagnostic::note(code).with_message(message).with_pos(pos));
    }

    fn limit_reached(&self) -> bool {
        self.config
            .error_limit
            .is_some_and(|limit| self.errors >= limit)
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Errors dropped because the limit was reached.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn mark(&self) -> BagMark {
        BagMark {
            len: self.diagnostics.len(),
            errors: self.errors,
            suppressed: self.suppressed,
        }
    }

    /// Forget everything reported since `mark`.
    pub fn rollback(&mut self, mark: BagMark) {
        while self.diagnostics.len() > mark.len {
            let Some(diag) = self.diagnostics.pop() else {
                break;
            };
            if self.config.deduplicate {
                self.seen.remove(&(diag.severity, diag.pos, diag.message));
            }
        }
        self.errors = mark.errors;
        self.suppressed = mark.suppressed;
    }

    /// Fail if any error has been reported so far.
    pub fn checkpoint(&self) -> Result<(), Aborted> {
        if self.has_errors() {
            return Err(Aborted::PreviousErrors {
                count: self.errors + self.suppressed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tern_ir::{SourceId, Span};

    use super::*;

    fn pos(start: u32) -> Pos {
        Pos::new(SourceId(0), Span::new(start, start + 1))
    }

    #[test]
    fn test_dedup_same_key() {
        let mut bag = DiagnosticBag::new();
        bag.error(ErrorCode::E2002, pos(1), "type mismatch");
        bag.error(ErrorCode::E2002, pos(1), "type mismatch");
        bag.error(ErrorCode::E2002, pos(2), "type mismatch");
        bag.warning(ErrorCode::W2001, pos(1), "type mismatch");
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.error_count(), 2);
        assert_eq!(bag.warning_count(), 1);
    }

    #[test]
    fn test_dedup_disabled() {
        let mut bag = DiagnosticBag::with_config(DiagnosticConfig {
            deduplicate: false,
            ..DiagnosticConfig::default()
        });
        bag.error(ErrorCode::E2002, pos(1), "type mismatch");
        bag.error(ErrorCode::E2002, pos(1), "type mismatch");
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_error_limit_counts_suppressed() {
        let mut bag = DiagnosticBag::with_config(DiagnosticConfig::default().with_error_limit(2));
        for i in 0..5 {
            bag.error(ErrorCode::E1001, pos(i), "expected");
        }
        bag.warning(ErrorCode::W1001, pos(9), "still recorded");
        assert_eq!(bag.error_count(), 2);
        assert_eq!(bag.suppressed_count(), 3);
        assert_eq!(bag.len(), 3);
        assert_eq!(
            bag.checkpoint(),
            Err(Aborted::PreviousErrors { count: 5 })
        );
    }

    #[test]
    fn test_rollback_forgets_dedup_keys() {
        let mut bag = DiagnosticBag::new();
        bag.error(ErrorCode::E1003, pos(0), "token out of context");
        let mark = bag.mark();
        bag.error(ErrorCode::E1001, pos(3), "expected '('");
        bag.warning(ErrorCode::W1001, pos(4), "same line");
        bag.rollback(mark);
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.error_count(), 1);

        // The discarded diagnostic can be reported again.
        bag.error(ErrorCode::E1001, pos(3), "expected '('");
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_checkpoint_ignores_warnings() {
        let mut bag = DiagnosticBag::new();
        assert_eq!(bag.checkpoint(), Ok(()));
        bag.warning(ErrorCode::W2002, pos(0), "constant boolean in boolean expression");
        bag.note(ErrorCode::E2012, pos(1), "use '?T' instead");
        assert_eq!(bag.checkpoint(), Ok(()));
        bag.error(ErrorCode::E2014, pos(2), "dividing by '0' at compile time");
        assert_eq!(bag.checkpoint(), Err(Aborted::PreviousErrors { count: 1 }));
    }

    #[test]
    fn test_aborted_messages() {
        assert_eq!(
            Aborted::PreviousErrors { count: 3 }.to_string(),
            "aborting due to 3 previous error(s)"
        );
        assert_eq!(Aborted::MissingEntryPoint.to_string(), "missing entrypoint");
    }

    proptest! {
        #[test]
        fn prop_reporting_twice_is_idempotent(
            entries in prop::collection::vec((0u32..8, 0usize..3), 0..32)
        ) {
            let messages = ["a", "b", "c"];
            let mut once = DiagnosticBag::new();
            let mut twice = DiagnosticBag::new();
            for &(start, msg) in &entries {
                once.error(ErrorCode::E2002, pos(start), messages[msg]);
                twice.error(ErrorCode::E2002, pos(start), messages[msg]);
                twice.error(ErrorCode::E2002, pos(start), messages[msg]);
            }
            prop_assert_eq!(once.diagnostics(), twice.diagnostics());
        }
    }
}
