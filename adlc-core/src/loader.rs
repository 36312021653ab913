//! Module Loader (§4.2): depth-first traversal from root `.adl` files,
//! resolving imports across a search path, detecting cycles, and merging
//! sidecar annotations into each module immediately after it is parsed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ast::{Import, Module, ModuleName};
use crate::error::{AdlError, AdlWarning};
use crate::file::SourceFile;
use crate::resolve::scope::STDLIB_MODULES;
use crate::{parser, sidecar, stdlib};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discovery {
    InProgress,
    Done,
}

/// Loads every module transitively reachable from `roots`, returning them
/// in dependency-first (topological) order plus any sidecar warnings
/// accumulated along the way.
pub fn load(roots: &[PathBuf], search_path: &[PathBuf], sidecar_exts: &[String]) -> Result<(Vec<Module>, Vec<AdlWarning>), AdlError> {
    let mut loader = Loader {
        search_path,
        sidecar_exts,
        state: HashMap::new(),
        order: Vec::new(),
        warnings: Vec::new(),
        stack: Vec::new(),
    };
    // Standard library modules are always on the search path (§6), whether
    // or not a root module imports them explicitly — the resolver's bare-name
    // fallback tier depends on their decls already being loaded.
    for stdlib_module in STDLIB_MODULES {
        loader.load_module(ModuleName::parse(stdlib_module), None)?;
    }
    for root in roots {
        let source = read_source_file(root)?;
        let module = parser::parse_module(&source)?;
        let name = module.name.clone();
        loader.load_module(name, Some(module))?;
    }
    Ok((loader.order, loader.warnings))
}

struct Loader<'a> {
    search_path: &'a [PathBuf],
    sidecar_exts: &'a [String],
    state: HashMap<ModuleName, Discovery>,
    order: Vec<Module>,
    warnings: Vec<AdlWarning>,
    stack: Vec<ModuleName>,
}

impl Loader<'_> {
    fn load_module(&mut self, name: ModuleName, already_parsed: Option<Module>) -> Result<(), AdlError> {
        match self.state.get(&name) {
            Some(Discovery::Done) => return Ok(()),
            Some(Discovery::InProgress) => {
                let mut cycle: Vec<ModuleName> = self.stack.iter().skip_while(|m| **m != name).cloned().collect();
                cycle.push(name);
                return Err(AdlError::ImportCycle { cycle });
            }
            None => {}
        }

        let mut module = match already_parsed {
            Some(m) => m,
            None => self.parse_module_by_name(&name)?,
        };

        self.state.insert(name.clone(), Discovery::InProgress);
        self.stack.push(name.clone());
        log::debug!("loading module {name}");

        let import_targets: Vec<ModuleName> = module.imports.iter().map(import_target).collect();
        for target in import_targets {
            self.load_module(target, None)?;
        }

        let warnings = sidecar::merge_sidecars(&mut module, self.search_path, self.sidecar_exts)?;
        self.warnings.extend(warnings);

        self.stack.pop();
        self.state.insert(name, Discovery::Done);
        self.order.push(module);
        Ok(())
    }

    fn parse_module_by_name(&self, name: &ModuleName) -> Result<Module, AdlError> {
        if let Some(text) = stdlib::lookup(name) {
            let source = SourceFile::synthetic(name.dotted(), text);
            return parser::parse_module(&source);
        }
        let relative = name.relative_path();
        for dir in self.search_path {
            let candidate = dir.join(&relative);
            if candidate.is_file() {
                let source = read_source_file(&candidate)?;
                return parser::parse_module(&source);
            }
        }
        Err(AdlError::ModuleNotFound {
            name: name.clone(),
            searched: self.search_path.iter().map(|p| p.display().to_string()).collect(),
        })
    }
}

fn import_target(import: &Import) -> ModuleName {
    match import {
        Import::WholeModule(name) => name.clone(),
        Import::Scoped(scoped) => scoped.module.clone(),
    }
}

fn read_source_file(path: &Path) -> Result<SourceFile, AdlError> {
    let text = std::fs::read_to_string(path).map_err(|_| AdlError::FileNotFound { path: path.display().to_string() })?;
    let module_name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    Ok(SourceFile::new(module_name, path.display().to_string(), text))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_transitive_imports_in_topological_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "base.adl", "module base { struct Id { String value; }; }");
        let app = write(dir.path(), "app.adl", "module app { import base.*; struct User { Id id; }; }");

        let (modules, warnings) = load(&[app], &[dir.path().to_path_buf()], &[]).unwrap();
        assert!(warnings.is_empty());
        let names: Vec<_> = modules.iter().map(|m| m.name.dotted()).filter(|n| !n.starts_with("sys.")).collect();
        assert_eq!(names, vec!["base".to_string(), "app".to_string()]);
    }

    #[test]
    fn detects_import_cycle() {
        let dir = tempdir().unwrap();
        let x = write(dir.path(), "x.adl", "module x { import y.*; struct X { Void v; }; }");
        write(dir.path(), "y.adl", "module y { import x.*; struct Y { Void v; }; }");

        let err = load(&[x], &[dir.path().to_path_buf()], &[]).unwrap_err();
        match err {
            AdlError::ImportCycle { cycle } => {
                let names: Vec<_> = cycle.iter().map(|m| m.dotted()).collect();
                assert_eq!(names, vec!["x".to_string(), "y".to_string(), "x".to_string()]);
            }
            other => panic!("expected ImportCycle, got {other:?}"),
        }
    }

    #[test]
    fn missing_module_reports_searched_dirs() {
        let dir = tempdir().unwrap();
        let app = write(dir.path(), "app.adl", "module app { import missing.*; struct User { Void v; }; }");

        let err = load(&[app], &[dir.path().to_path_buf()], &[]).unwrap_err();
        assert!(matches!(err, AdlError::ModuleNotFound { .. }));
    }

    #[test]
    fn stdlib_modules_resolve_without_search_path() {
        let dir = tempdir().unwrap();
        let app = write(dir.path(), "app.adl", "module app { import sys.types.*; struct Box { Maybe<String> inner; }; }");

        let (modules, _) = load(&[app], &[dir.path().to_path_buf()], &[]).unwrap();
        let names: Vec<_> = modules.iter().map(|m| m.name.dotted()).collect();
        assert!(names.contains(&"sys.types".to_string()));
        assert_eq!(names.last(), Some(&"app".to_string()));
    }

    #[test]
    fn stdlib_modules_preload_even_without_explicit_import() {
        let dir = tempdir().unwrap();
        let app = write(dir.path(), "app.adl", "module app { struct Box { Void v; }; }");

        let (modules, _) = load(&[app], &[dir.path().to_path_buf()], &[]).unwrap();
        let names: Vec<_> = modules.iter().map(|m| m.name.dotted()).collect();
        for stdlib_module in STDLIB_MODULES {
            assert!(names.contains(&stdlib_module.to_string()), "missing {stdlib_module}");
        }
    }
}
