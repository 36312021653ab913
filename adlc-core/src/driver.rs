//! Backend Driver Interface (§4.7): the read-only contract a backend code
//! generator is given once the core has resolved every module — ordered
//! decl iteration, a total resolver, package-path mapping, and annotation
//! accessors.

use std::collections::HashMap;

use crate::ast::{Annotations, Decl, Literal, Module, ModuleName, ScopedName};
use crate::error::AdlError;
use crate::resolve::LoadedAdl;

/// Everything an embedder (the CLI, or any future build-system plugin)
/// assembles before invoking the core; no parsing logic lives here.
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    pub search_path: Vec<std::path::PathBuf>,
    pub sidecar_exts: Vec<String>,
    pub output_root: std::path::PathBuf,
    pub no_overwrite: bool,
    pub manifest_path: Option<std::path::PathBuf>,
}

/// A target-package-path mapping, supplied by the backend (§4.7): a root
/// package plus overrides for specific modules.
#[derive(Debug, Clone, Default)]
pub struct PackageMapping {
    pub root_package: String,
    pub per_module_overrides: HashMap<ModuleName, String>,
}

impl PackageMapping {
    pub fn package_for(&self, module: &ModuleName) -> String {
        self.per_module_overrides.get(module).cloned().unwrap_or_else(|| format!("{}.{}", self.root_package, module.dotted()))
    }
}

/// Read-only view over a resolved program, handed to backend code
/// generators. `loaded.modules` is already topological; `decls()` walks it
/// module-by-module, decl-by-declaration-order.
pub struct Driver<'a> {
    loaded: &'a LoadedAdl,
}

impl<'a> Driver<'a> {
    pub fn new(loaded: &'a LoadedAdl) -> Self {
        Self { loaded }
    }

    /// `(module, decl)` pairs in dependency-first module order, declaration
    /// order within a module.
    pub fn decls(&self) -> impl Iterator<Item = (&'a Module, &'a Decl)> {
        self.loaded.modules.iter().flat_map(|module| module.decls_in_order().map(move |decl| (module, decl)))
    }

    pub fn resolve(&self, name: &ScopedName) -> Result<&'a Decl, AdlError> {
        self.loaded.resolve(name)
    }
}

pub fn get_annotation<'a>(annotations: &'a Annotations, scoped_name: &ScopedName) -> Option<&'a Literal> {
    annotations.get(scoped_name)
}

pub fn get_string_annotation<'a>(annotations: &'a Annotations, scoped_name: &ScopedName) -> Option<&'a str> {
    match get_annotation(annotations, scoped_name)? {
        Literal::Str(s) => Some(s.as_str()),
        _ => None,
    }
}

pub fn get_bool_annotation(annotations: &Annotations, scoped_name: &ScopedName) -> Option<bool> {
    match get_annotation(annotations, scoped_name)? {
        Literal::Bool(b) => Some(*b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::file::SourceFile;
    use crate::parser::parse_module;
    use crate::resolve::resolve_all;

    use super::*;

    #[test]
    fn decls_iterate_in_module_and_declaration_order() {
        let base = parse_module(&SourceFile::synthetic("base", "module base { struct A { Void v; }; struct B { Void v; }; }")).unwrap();
        let loaded = resolve_all(vec![base]).unwrap();
        let driver = Driver::new(&loaded);
        let names: Vec<_> = driver.decls().map(|(_, d)| d.name.clone()).collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn package_mapping_falls_back_to_root_package() {
        let mapping = PackageMapping { root_package: "com.example".to_string(), per_module_overrides: HashMap::new() };
        assert_eq!(mapping.package_for(&ModuleName::parse("foo.bar")), "com.example.foo.bar");
    }

    #[test]
    fn package_mapping_override_wins() {
        let mut overrides = HashMap::new();
        overrides.insert(ModuleName::parse("foo.bar"), "custom.pkg".to_string());
        let mapping = PackageMapping { root_package: "com.example".to_string(), per_module_overrides: overrides };
        assert_eq!(mapping.package_for(&ModuleName::parse("foo.bar")), "custom.pkg");
    }

    #[test]
    fn string_and_bool_annotation_accessors_specialize() {
        let mut annotations = Annotations::new();
        let doc = ScopedName::parse("sys.annotations.Doc");
        annotations.insert(doc.clone(), Literal::Str("hello".to_string()));
        assert_eq!(get_string_annotation(&annotations, &doc), Some("hello"));
        assert_eq!(get_bool_annotation(&annotations, &doc), None);
    }
}
