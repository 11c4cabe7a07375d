//! A single reported problem and its rendering.

use std::fmt::{self, Write as _};

use tern_ir::{Pos, SourceMap};

use crate::{ErrorCode, LineIndex};

/// How serious a diagnostic is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        })
    }
}

/// A diagnostic message.
///
/// `pos` is `None` only for whole-unit problems such as a missing entry
/// point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub pos: Option<Pos>,
    pub message: String,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            pos: None,
            message: String::new(),
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    #[cold]
    pub fn note(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Note)
    }

    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    #[must_use]
    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `file(line:col): severity[code]: message`, followed by the source
    /// line and a caret underline when the position can be resolved.
    pub fn render(&self, sources: &SourceMap) -> String {
        let mut out = String::new();
        let source = self.pos.and_then(|pos| Some((pos, sources.get(pos.source)?)));

        let Some((pos, source)) = source else {
            let _ = write!(out, "{}[{}]: {}", self.severity, self.code, self.message);
            self.render_notes(&mut out);
            return out;
        };

        let index = LineIndex::new(source.text());
        let (line, col) = index.line_col(source.text(), pos.span.start);
        let _ = write!(
            out,
            "{}({line}:{col}): {}[{}]: {}",
            source.name(),
            self.severity,
            self.code,
            self.message
        );

        if let Some(text) = index.line_text(source.text(), line) {
            let gutter = line.to_string();
            let width = text
                .get((col as usize).saturating_sub(1)..)
                .map_or(1, |rest| {
                    let span_len = pos.span.len() as usize;
                    rest.char_indices()
                        .take_while(|(i, _)| *i < span_len)
                        .count()
                        .max(1)
                });
            let _ = write!(out, "\n {gutter} | {text}");
            let _ = write!(
                out,
                "\n {} | {}{}",
                " ".repeat(gutter.len()),
                " ".repeat((col as usize).saturating_sub(1)),
                "^".repeat(width)
            );
        }
        self.render_notes(&mut out);
        out
    }

    fn render_notes(&self, out: &mut String) {
        for note in &self.notes {
            let _ = write!(out, "\n  = note: {note}");
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tern_ir::{Source, Span};

    use super::*;

    #[test]
    fn test_builder() {
        let pos = Pos::new(tern_ir::SourceId(0), Span::new(1, 2));
        let diag = Diagnostic::error(ErrorCode::E2002)
            .with_message("type mismatch")
            .with_pos(pos)
            .with_note("first")
            .with_note("second");
        assert!(diag.is_error());
        assert_eq!(diag.pos, Some(pos));
        assert_eq!(diag.notes, vec!["first".to_string(), "second".to_string()]);
        assert_eq!(diag.to_string(), "error[E2002]: type mismatch");
    }

    #[test]
    fn test_render_with_source_line() {
        let mut map = SourceMap::new();
        let id = map.add(Source::new("demo.tn", "fn main() {}\nfn f(): i32 { true }\n"));
        let diag = Diagnostic::error(ErrorCode::E2002)
            .with_message("type mismatch: expected 'i32', got 'bool'")
            .with_pos(Pos::new(id, Span::new(27, 31)));
        assert_eq!(
            diag.render(&map),
            "demo.tn(2:15): error[E2002]: type mismatch: expected 'i32', got 'bool'\n \
             2 | fn f(): i32 { true }\n   |               ^^^^"
        );
    }

    #[test]
    fn test_render_without_position() {
        let map = SourceMap::new();
        let diag = Diagnostic::error(ErrorCode::E2020)
            .with_message("missing entrypoint")
            .with_note("declare 'fn main()'");
        assert_eq!(
            diag.render(&map),
            "error[E2020]: missing entrypoint\n  = note: declare 'fn main()'"
        );
    }
}
