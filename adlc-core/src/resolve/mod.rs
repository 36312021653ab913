//! Resolver & Type Checker (§4.4): binds every name, checks kind/arity,
//! rejects type-alias cycles, and validates default-value literals against
//! their declared types — in that fixed per-module sequence, modules
//! processed in the topological order the loader already produced.

pub mod aliascycle;
pub mod default_value;
pub mod scope;

use std::collections::HashSet;

use crate::ast::{Decl, DeclBody, Module, ModuleName, ScopedName, TypeExpr, TypeHead};
use crate::error::AdlError;
use crate::map::OrderedMap;
use crate::nom_tools::Loc;

use scope::{ModuleScope, Resolved};

/// The modules and flattened decl table produced once every module has
/// passed the resolver: `modules` is still in topological order, and
/// `all_decls` is the total `ScopedName -> Decl` function §3 calls the
/// resolver.
#[derive(Debug)]
pub struct LoadedAdl {
    pub modules: Vec<Module>,
    pub all_decls: OrderedMap<ScopedName, Decl>,
}

impl LoadedAdl {
    pub fn resolve(&self, name: &ScopedName) -> Result<&Decl, AdlError> {
        self.all_decls.get(name).ok_or_else(|| AdlError::UnknownType { name: name.to_string(), loc: Loc::synthetic() })
    }
}

/// Resolves every module in `modules` (already in dependency-first order),
/// accumulating the global decl table as it goes so later modules can
/// resolve references into earlier ones.
pub fn resolve_all(mut modules: Vec<Module>) -> Result<LoadedAdl, AdlError> {
    let known_modules: HashSet<ModuleName> = modules.iter().map(|m| m.name.clone()).collect();
    let mut all_decls: OrderedMap<ScopedName, Decl> = OrderedMap::new();
    for module in &mut modules {
        resolve_module(module, &all_decls, &known_modules)?;
        for decl in module.decls_in_order() {
            all_decls.validate_insert(ScopedName::new(module.name.clone(), decl.name.clone()), decl.clone())?;
        }
    }
    log::info!("resolved {} modules", modules.len());
    Ok(LoadedAdl { modules, all_decls })
}

fn resolve_module(module: &mut Module, all_decls: &OrderedMap<ScopedName, Decl>, known_modules: &HashSet<ModuleName>) -> Result<(), AdlError> {
    let scope = ModuleScope::build(module.name.clone(), &module.decls, &module.imports, all_decls, known_modules)?;

    for decl in &mut module.decls {
        check_name_uniqueness(decl)?;
        let type_params = decl.body.type_params().to_vec();
        resolve_decl_body(&mut decl.body, &type_params, &scope, all_decls)?;
    }

    aliascycle::check_no_alias_cycles(&module.name, &module.decls)?;

    for decl in &module.decls {
        check_decl_defaults(decl, all_decls)?;
    }

    log::debug!("resolved module {}", module.name);
    Ok(())
}

/// Invariant 6 (§3): field names and type-parameter names are each unique
/// within a decl. Unions additionally require at least one field.
fn check_name_uniqueness(decl: &Decl) -> Result<(), AdlError> {
    let type_params = decl.body.type_params();
    for (i, p) in type_params.iter().enumerate() {
        if type_params[..i].contains(p) {
            return Err(AdlError::DuplicateDecl { name: format!("{}<{}>", decl.name, p), first: decl.loc.clone(), second: decl.loc.clone() });
        }
    }
    let fields = decl.body.fields();
    for (i, f) in fields.iter().enumerate() {
        if fields[..i].iter().any(|other| other.name == f.name) {
            return Err(AdlError::DuplicateDecl { name: format!("{}.{}", decl.name, f.name), first: decl.loc.clone(), second: f.loc.clone() });
        }
    }
    if matches!(&decl.body, DeclBody::Union(u) if u.fields.is_empty()) {
        return Err(AdlError::ArityMismatch { name: decl.name.clone(), expected: 1, got: 0, loc: decl.loc.clone() });
    }
    Ok(())
}

fn resolve_decl_body(body: &mut DeclBody, type_params: &[String], scope: &ModuleScope, all_decls: &OrderedMap<ScopedName, Decl>) -> Result<(), AdlError> {
    match body {
        DeclBody::Struct(s) => {
            for field in &mut s.fields {
                resolve_type_expr(&mut field.type_expr, type_params, scope, all_decls)?;
            }
        }
        DeclBody::Union(u) => {
            for field in &mut u.fields {
                resolve_type_expr(&mut field.type_expr, type_params, scope, all_decls)?;
            }
        }
        DeclBody::TypeDef(t) => resolve_type_expr(&mut t.type_expr, type_params, scope, all_decls)?,
        DeclBody::NewType(n) => resolve_type_expr(&mut n.type_expr, type_params, scope, all_decls)?,
    }
    Ok(())
}

/// §4.4 steps 3-4: resolves `te`'s head against local type params, local
/// decls, primitives, imports, and the standard library (in that order,
/// see `scope`), then checks its parameter count against the resolved
/// arity, recursing into each parameter.
fn resolve_type_expr(te: &mut TypeExpr, type_params: &[String], scope: &ModuleScope, all_decls: &OrderedMap<ScopedName, Decl>) -> Result<(), AdlError> {
    let TypeHead::Unresolved { path } = &te.head else {
        for param in &mut te.parameters {
            resolve_type_expr(param, type_params, scope, all_decls)?;
        }
        return Ok(());
    };

    let (head, arity) = if path.len() == 1 {
        let name = path[0].clone();
        match scope.resolve_bare(&name, type_params, all_decls) {
            Some(Resolved::TypeParam) => (TypeHead::TypeParam(name), 0),
            Some(Resolved::Primitive(p)) => (TypeHead::Primitive(p), p.arity()),
            Some(Resolved::Reference(scoped, arity)) => (TypeHead::Reference(scoped), arity),
            None => return Err(AdlError::UnknownType { name, loc: te.loc.clone() }),
        }
    } else {
        let name = path.last().cloned().unwrap_or_default();
        let module = ModuleName::new(path[..path.len() - 1].to_vec());
        let scoped = ScopedName::new(module, name);
        match all_decls.get(&scoped) {
            Some(decl) => (TypeHead::Reference(scoped), decl.body.arity()),
            None => return Err(AdlError::UnknownType { name: scoped.to_string(), loc: te.loc.clone() }),
        }
    };

    if te.parameters.len() != arity {
        return Err(AdlError::ArityMismatch { name: type_expr_head_name(&head), expected: arity, got: te.parameters.len(), loc: te.loc.clone() });
    }

    te.head = head;
    for param in &mut te.parameters {
        resolve_type_expr(param, type_params, scope, all_decls)?;
    }
    Ok(())
}

fn type_expr_head_name(head: &TypeHead) -> String {
    match head {
        TypeHead::Primitive(p) => p.to_string(),
        TypeHead::TypeParam(n) => n.clone(),
        TypeHead::Reference(s) => s.to_string(),
        TypeHead::Unresolved { path } => path.join("."),
    }
}

fn check_decl_defaults(decl: &Decl, all_decls: &OrderedMap<ScopedName, Decl>) -> Result<(), AdlError> {
    match &decl.body {
        DeclBody::Struct(s) => {
            for field in &s.fields {
                if let Some(default) = &field.default {
                    default_value::check_default(default, &field.type_expr, all_decls, &format!("{}.{}", decl.name, field.name), &field.loc)?;
                }
            }
        }
        DeclBody::Union(u) => {
            for field in &u.fields {
                if let Some(default) = &field.default {
                    default_value::check_default(default, &field.type_expr, all_decls, &format!("{}.{}", decl.name, field.name), &field.loc)?;
                }
            }
        }
        DeclBody::NewType(n) => {
            if let Some(default) = &n.default {
                default_value::check_default(default, &n.type_expr, all_decls, &decl.name, &decl.loc)?;
            }
        }
        DeclBody::TypeDef(_) => {}
    }
    Ok(())
}
