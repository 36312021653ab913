//! Source file representation for the ADL compiler.
//!
//! A [`SourceFile`] pairs a logical module path with the bytes the lexer
//! reads. It is cheap to clone (the text is reference-counted) so it can be
//! attached to every diagnostic and AST node that needs to point back at
//! its origin.

use std::fmt;
use std::rc::Rc;

/// A loaded ADL source file, identified by the dotted module name it was
/// parsed as (e.g. `foo.bar.baz`) and the directory it was found under.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    /// Dotted module name this file declares, e.g. `"foo.bar.baz"`.
    pub module_name: String,
    /// Path the file was read from, for diagnostics.
    pub path: Rc<String>,
    /// Full UTF-8 source text.
    pub text: Rc<String>,
}

impl SourceFile {
    pub fn new(module_name: impl Into<String>, path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            path: Rc::new(path.into()),
            text: Rc::new(text.into()),
        }
    }

    /// A synthetic source file for standard-library modules and in-memory
    /// fixtures that have no backing path on disk.
    pub fn synthetic(module_name: impl Into<String>, text: impl Into<String>) -> Self {
        let module_name = module_name.into();
        let path = format!("<{module_name}>");
        Self::new(module_name, path, text)
    }

    /// Line and column (both 1-based) of a byte offset into [`Self::text`].
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let mut line = 1usize;
        let mut col = 1usize;
        for ch in self.text[..offset].chars() {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile").field("module_name", &self.module_name).field("path", &self.path).finish()
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}
