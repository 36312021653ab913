//! Error taxonomy and diagnostic rendering for the ADL compiler (§7).
//!
//! Every fallible core operation returns `Result<T, AdlError>`. The first
//! error encountered during loading or resolution is the one that
//! propagates — the core does not attempt recovery (§7 propagation
//! policy). [`AdlError::report`] renders the single-line diagnostic format
//! from §7 plus a `codespan-reporting` rich report to a writer.

use std::io::Write;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor::{ColorChoice, StandardStream}};

use crate::ast::{ModuleName, ScopedName};
use crate::file::SourceFile;

/// A source position with no lifetime dependency, suitable for storing in
/// an error. Re-exported so callers don't need to reach into `nom_tools`.
pub type Loc = crate::nom_tools::Loc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AdlError {
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("parse error: {message}")]
    ParseError { loc: Loc, message: String, expected: String, found: String },

    #[error("module not found: {name}")]
    ModuleNotFound { name: ModuleName, searched: Vec<String> },

    #[error("import cycle: {}", cycle_names(cycle))]
    ImportCycle { cycle: Vec<ModuleName> },

    #[error("duplicate declaration: {name}")]
    DuplicateDecl { name: String, first: Loc, second: Loc },

    #[error("unknown import: {what}")]
    UnknownImport { what: String, loc: Loc },

    #[error("unknown type: {name}")]
    UnknownType { name: String, loc: Loc },

    #[error("arity mismatch for {name}: expected {expected}, got {got}")]
    ArityMismatch { name: String, expected: usize, got: usize, loc: Loc },

    #[error("type alias cycle: {}", cycle.join(" -> "))]
    TypeAliasCycle { cycle: Vec<String>, loc: Loc },

    #[error("default value mismatch at {path}: expected {expected}, got {got}")]
    DefaultValueMismatch { path: String, expected: String, got: String, loc: Loc },

    #[error("annotation shape error for {annotation}: {message}")]
    AnnotationShapeError { annotation: ScopedName, message: String },

    #[error("emit error: {message}")]
    EmitError { path: String, message: String },

    #[error("io error: {message}")]
    IOError { message: String },
}

fn cycle_names(cycle: &[ModuleName]) -> String {
    cycle.iter().map(|m| m.dotted()).collect::<Vec<_>>().join(" -> ")
}

impl From<std::io::Error> for AdlError {
    fn from(err: std::io::Error) -> Self {
        AdlError::IOError { message: err.to_string() }
    }
}

impl AdlError {
    /// Location used for the single-line `<file>:<line>:<col>:` prefix,
    /// when the error carries one.
    pub fn primary_loc(&self) -> Option<&Loc> {
        match self {
            AdlError::ParseError { loc, .. }
            | AdlError::DuplicateDecl { second: loc, .. }
            | AdlError::UnknownImport { loc, .. }
            | AdlError::UnknownType { loc, .. }
            | AdlError::ArityMismatch { loc, .. }
            | AdlError::TypeAliasCycle { loc, .. }
            | AdlError::DefaultValueMismatch { loc, .. } => Some(loc),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdlError::FileNotFound { .. } => "FileNotFound",
            AdlError::ParseError { .. } => "ParseError",
            AdlError::ModuleNotFound { .. } => "ModuleNotFound",
            AdlError::ImportCycle { .. } => "ImportCycle",
            AdlError::DuplicateDecl { .. } => "DuplicateDecl",
            AdlError::UnknownImport { .. } => "UnknownImport",
            AdlError::UnknownType { .. } => "UnknownType",
            AdlError::ArityMismatch { .. } => "ArityMismatch",
            AdlError::TypeAliasCycle { .. } => "TypeAliasCycle",
            AdlError::DefaultValueMismatch { .. } => "DefaultValueMismatch",
            AdlError::AnnotationShapeError { .. } => "AnnotationShapeError",
            AdlError::EmitError { .. } => "EmitError",
            AdlError::IOError { .. } => "IOError",
        }
    }

    /// The single-line diagnostic described in §7:
    /// `<file>:<line>:<col>: <kind>: <message>`.
    pub fn diagnostic_line(&self) -> String {
        match self.primary_loc() {
            Some(loc) => {
                let (line, col) = loc.file.line_col(loc.range.start);
                format!("{}:{}:{}: {}: {}", loc.file.path, line, col, self.kind(), self)
            }
            None => format!("{}: {}", self.kind(), self),
        }
    }

    /// Writes a `codespan-reporting` rich diagnostic for this error to
    /// `writer`, falling back to the plain diagnostic line when there is no
    /// source span to highlight.
    pub fn report(&self, writer: &mut StandardStream) -> std::io::Result<()> {
        let Some(loc) = self.primary_loc() else {
            writeln!(writer, "{}", self.diagnostic_line())?;
            return Ok(());
        };
        let mut files = SimpleFiles::new();
        let file_id = files.add(loc.file.path.to_string(), loc.file.text.to_string());
        let label = Label::primary(file_id, range_for(loc)).with_message(self.to_string());
        let diagnostic = Diagnostic::error().with_message(self.kind()).with_labels(vec![label]);
        let config = codespan_reporting::term::Config::default();
        let mut stream_writer = writer.lock();
        term::emit(&mut stream_writer, &config, &files, &diagnostic)
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    pub fn already_defined(name: impl Into<String>, first: Loc, second: Loc) -> AdlError {
        AdlError::DuplicateDecl { name: name.into(), first, second }
    }
}

fn range_for(loc: &Loc) -> Range<usize> {
    loc.range.clone()
}

/// Non-fatal sidecar warnings, accumulated across a load and printed but
/// never halting compilation (§4.3, §7).
#[derive(Debug, Clone)]
pub struct AdlWarning {
    pub message: String,
    pub loc: Loc,
}

impl std::fmt::Display for AdlWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, col) = self.loc.file.line_col(self.loc.range.start);
        write!(f, "{}:{}:{}: warning: {}", self.loc.file.path, line, col, self.message)
    }
}

/// Prints an error's diagnostic report to stderr, matching the CLI's
/// "first error wins, unwind" behaviour (§7).
pub fn print_error(err: &AdlError) {
    let mut stream = StandardStream::stderr(ColorChoice::Auto);
    let _ = err.report(&mut stream);
}
