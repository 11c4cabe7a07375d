//! One compilation, start to finish.

use std::path::Path;

use rayon::prelude::*;
use tern_diagnostic::{Aborted, Diagnostic, DiagnosticBag, DiagnosticConfig};
use tern_ir::ast::Namespace;
use tern_ir::{Source, SourceId, SourceMap, Token};
use tern_lower::{LowerConfig, PointerWidth};
use tern_mir::MirModule;
use tern_types::SymbolTable;
use tracing::debug;

use crate::CompileError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name of the function execution starts at.
    pub entry_point: String,
    /// Report a missing entry point. Off for library units.
    pub expect_entry_point: bool,
    pub pointer_width: PointerWidth,
    pub diagnostics: DiagnosticConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            entry_point: "main".to_owned(),
            expect_entry_point: true,
            pointer_width: PointerWidth::default(),
            diagnostics: DiagnosticConfig::default(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn library(mut self) -> Self {
        self.expect_entry_point = false;
        self
    }

    fn lower_config(&self) -> LowerConfig {
        LowerConfig {
            pointer_width: self.pointer_width,
            entry_point: self.entry_point.clone(),
            expect_entry_point: self.expect_entry_point,
        }
    }
}

/// State of a single compilation unit.
///
/// A session is run once. Compiling again means building a new one.
pub struct Session {
    config: SessionConfig,
    sources: SourceMap,
    bag: DiagnosticBag,
    symbols: SymbolTable,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let bag = DiagnosticBag::with_config(config.diagnostics.clone());
        Session {
            config,
            sources: SourceMap::new(),
            bag,
            symbols: SymbolTable::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn add_source(&mut self, source: Source) -> SourceId {
        self.sources.add(source)
    }

    /// Read a file from disk and add it under its path.
    pub fn add_file(&mut self, path: &Path) -> Result<SourceId, CompileError> {
        let text = std::fs::read_to_string(path).map_err(|source| CompileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.add_source(Source::new(path.display().to_string(), text)))
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.bag
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Every diagnostic rendered against this session's sources.
    pub fn render_diagnostics(&self) -> impl Iterator<Item = String> + '_ {
        self.bag.iter().map(|diag| diag.render(&self.sources))
    }

    /// Lex, parse and lower every source added so far.
    #[tracing::instrument(level = "debug", skip_all, fields(sources = self.sources.len()))]
    pub fn run(&mut self) -> Result<MirModule, Aborted> {
        let streams: Vec<Vec<Token>> = self
            .sources
            .iter()
            .map(|(id, source)| tern_lexer::tokenize(id, source, &mut self.bag))
            .collect();
        self.bag.checkpoint()?;

        let mut namespace = Namespace::new();
        for tokens in &streams {
            namespace.merge(tern_parse::parse(tokens, &mut self.bag)?);
        }
        self.bag.checkpoint()?;
        debug!(members = namespace.members.len(), "front end done");

        let config = self.config.lower_config();
        tern_lower::generate_with(&namespace, &mut self.symbols, &mut self.bag, &config)
    }

    /// Run the session and keep either the module or the diagnostics.
    pub fn finish(mut self) -> Result<MirModule, Vec<Diagnostic>> {
        match self.run() {
            Ok(module) => Ok(module),
            Err(aborted) => {
                debug!(%aborted, "compilation failed");
                Err(self.bag.into_vec())
            }
        }
    }
}

/// Compile `sources` as one unit with the default configuration.
pub fn compile(sources: impl IntoIterator<Item = Source>) -> Result<MirModule, Vec<Diagnostic>> {
    compile_with(sources, &SessionConfig::default())
}

pub fn compile_with(
    sources: impl IntoIterator<Item = Source>,
    config: &SessionConfig,
) -> Result<MirModule, Vec<Diagnostic>> {
    let mut session = Session::new(config.clone());
    for source in sources {
        session.add_source(source);
    }
    session.finish()
}

/// Compile independent units in parallel. Results keep the order of
/// `units`; each unit gets its own session.
pub fn compile_all(
    units: Vec<Vec<Source>>,
    config: &SessionConfig,
) -> Vec<Result<MirModule, Vec<Diagnostic>>> {
    units
        .into_par_iter()
        .map(|unit| compile_with(unit, config))
        .collect()
}
