//! Local binding table and import table construction (§4.4 steps 1-2), plus
//! bare-name resolution (§4.4 step 3) in the priority order:
//! local type parameter -> local decl -> primitive -> import -> standard
//! library. (Primitives are guaranteed to win over imports/standard-library
//! names; their relative position against local decls is not pinned down by
//! the source text, so this implementation resolves local decls first —
//! recorded as an open-question decision.)

use std::collections::{HashMap, HashSet};

use crate::ast::{Decl, Import, ModuleName, Primitive, ScopedName};
use crate::error::AdlError;
use crate::map::OrderedMap;
use crate::nom_tools::Loc;

pub const STDLIB_MODULES: [&str; 4] = ["sys.types", "sys.annotations", "sys.adlast", "sys.dynamic"];

/// Per-module binding context built once before resolving any of its type
/// expressions.
#[derive(Debug)]
pub struct ModuleScope {
    pub module_name: ModuleName,
    local_decls: HashMap<String, usize>,
    imported_names: HashMap<String, ScopedName>,
}

impl ModuleScope {
    /// Builds the local binding table (step 1) and import table (step 2)
    /// for `decls`/`imports`, both already known to belong to `module_name`.
    /// `known_modules` is the full set of module names the loader resolved
    /// (stdlib included), used to tell a real "module does not exist" from
    /// a real module that simply has zero top-level decls.
    pub fn build(
        module_name: ModuleName,
        decls: &[Decl],
        imports: &[Import],
        all_decls: &OrderedMap<ScopedName, Decl>,
        known_modules: &HashSet<ModuleName>,
    ) -> Result<Self, AdlError> {
        let mut local_decls = HashMap::new();
        let mut seen: HashMap<String, &Decl> = HashMap::new();
        for decl in decls {
            if let Some(first) = seen.insert(decl.name.clone(), decl) {
                return Err(AdlError::already_defined(decl.name.clone(), first.loc.clone(), decl.loc.clone()));
            }
            local_decls.insert(decl.name.clone(), decl.body.arity());
        }

        let mut imported_names = HashMap::new();
        for import in imports {
            match import {
                Import::WholeModule(target) => {
                    if !known_modules.contains(target) && !STDLIB_MODULES.contains(&target.dotted().as_str()) {
                        return Err(AdlError::UnknownImport { what: target.dotted(), loc: Loc::synthetic() });
                    }
                    for name in module_decl_names(all_decls, target) {
                        imported_names.insert(name.clone(), ScopedName::new(target.clone(), name));
                    }
                }
                Import::Scoped(scoped) => {
                    if all_decls.get(scoped).is_none() {
                        return Err(AdlError::UnknownImport { what: scoped.to_string(), loc: Loc::synthetic() });
                    }
                    imported_names.insert(scoped.name.clone(), scoped.clone());
                }
            }
        }

        Ok(Self { module_name, local_decls, imported_names })
    }

    /// Resolves a bare identifier (single-segment type-expression head) to
    /// a scoped name and its declared arity, per the priority order
    /// described on this module.
    pub fn resolve_bare(&self, name: &str, enclosing_type_params: &[String], all_decls: &OrderedMap<ScopedName, Decl>) -> Option<Resolved> {
        if enclosing_type_params.iter().any(|p| p == name) {
            return Some(Resolved::TypeParam);
        }
        if let Some(&arity) = self.local_decls.get(name) {
            return Some(Resolved::Reference(ScopedName::new(self.module_name.clone(), name.to_string()), arity));
        }
        if let Some(primitive) = Primitive::from_name(name) {
            return Some(Resolved::Primitive(primitive));
        }
        if let Some(scoped) = self.imported_names.get(name) {
            let arity = all_decls.get(scoped).map(|d| d.body.arity()).unwrap_or(0);
            return Some(Resolved::Reference(scoped.clone(), arity));
        }
        for stdlib_module in STDLIB_MODULES {
            let scoped = ScopedName::new(ModuleName::parse(stdlib_module), name.to_string());
            if let Some(decl) = all_decls.get(&scoped) {
                return Some(Resolved::Reference(scoped, decl.body.arity()));
            }
        }
        None
    }
}

pub enum Resolved {
    TypeParam,
    Primitive(Primitive),
    Reference(ScopedName, usize),
}

fn module_decl_names(all_decls: &OrderedMap<ScopedName, Decl>, module: &ModuleName) -> Vec<String> {
    all_decls.iter().filter(|(k, _)| &k.module == module).map(|(k, _)| k.name.clone()).collect()
}
