use std::path::PathBuf;

use tern_diagnostic::Aborted;

/// Failure of the driver itself, outside of what the diagnostics report.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Aborted(#[from] Aborted),
}
