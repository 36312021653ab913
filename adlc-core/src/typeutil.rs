//! Type Expression Utilities (§4.5): alias/newtype expansion, monomorphic
//! instantiation, and canonical rendering. Pure functions over an already
//! resolved decl table — nothing here mutates `all_decls`.

use std::collections::HashMap;

use crate::ast::{Decl, DeclBody, Field, NewTypeBody, ScopedName, StructBody, TypeDefBody, TypeExpr, TypeHead, UnionBody};
use crate::map::OrderedMap;

fn substitute(te: &TypeExpr, bindings: &HashMap<String, TypeExpr>) -> TypeExpr {
    match &te.head {
        TypeHead::TypeParam(name) => bindings.get(name).cloned().unwrap_or_else(|| te.clone()),
        _ => TypeExpr {
            head: te.head.clone(),
            parameters: te.parameters.iter().map(|p| substitute(p, bindings)).collect(),
            loc: te.loc.clone(),
        },
    }
}

fn bindings_for(decl: &Decl, arguments: &[TypeExpr]) -> HashMap<String, TypeExpr> {
    decl.body.type_params().iter().cloned().zip(arguments.iter().cloned()).collect()
}

/// If `te` heads a type-alias decl, substitutes the alias's RHS with the
/// bound parameters and repeats until the head is no longer an alias.
/// Terminates because alias cycles are rejected in §4.4 step 5 before this
/// ever runs.
pub fn expand_type_alias(te: &TypeExpr, all_decls: &OrderedMap<ScopedName, Decl>) -> TypeExpr {
    let mut current = te.clone();
    loop {
        let TypeHead::Reference(scoped) = &current.head else { return current };
        let Some(decl) = all_decls.get(scoped) else { return current };
        let DeclBody::TypeDef(body) = &decl.body else { return current };
        let bindings = bindings_for(decl, &current.parameters);
        current = substitute(&body.type_expr, &bindings);
    }
}

/// As [`expand_type_alias`], but for newtypes: unwraps one layer to the
/// underlying representation type. Does not chase nested aliases or
/// newtypes; callers that need both call each expansion in turn.
pub fn expand_newtype(te: &TypeExpr, all_decls: &OrderedMap<ScopedName, Decl>) -> TypeExpr {
    let TypeHead::Reference(scoped) = &te.head else { return te.clone() };
    let Some(decl) = all_decls.get(scoped) else { return te.clone() };
    let DeclBody::NewType(body) = &decl.body else { return te.clone() };
    let bindings = bindings_for(decl, &te.parameters);
    substitute(&body.type_expr, &bindings)
}

/// Which expansions [`expand_types`] applies, and how deep.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandOptions {
    pub aliases: bool,
    pub newtypes: bool,
}

/// Recursively applies the configured expansions into every parameter of
/// `te`, not just its head.
pub fn expand_types(te: &TypeExpr, opts: ExpandOptions, all_decls: &OrderedMap<ScopedName, Decl>) -> TypeExpr {
    let mut current = te.clone();
    if opts.aliases {
        current = expand_type_alias(&current, all_decls);
    }
    if opts.newtypes {
        current = expand_newtype(&current, all_decls);
    }
    TypeExpr {
        head: current.head,
        parameters: current.parameters.iter().map(|p| expand_types(p, opts, all_decls)).collect(),
        loc: current.loc,
    }
}

/// Default derived-name function for [`monomorphic_decl`]: `Name_Param1_Param2`.
pub fn default_mono_name(original: &str, parameters: &[TypeExpr]) -> String {
    let mut name = original.to_string();
    for p in parameters {
        name.push('_');
        name.push_str(&type_expr_to_string(p));
    }
    name
}

/// Produces a non-generic clone of the decl `te.head` names (a saturated
/// application of a generic decl), substituting every `TypeParam` with the
/// corresponding argument from `te.parameters`. The clone is named by
/// `name_fn(original_name, parameters)`; callers collecting monomorphic
/// decls into a registry should dedupe by that computed name (§4.5, §9).
pub fn monomorphic_decl(te: &TypeExpr, all_decls: &OrderedMap<ScopedName, Decl>, name_fn: impl Fn(&str, &[TypeExpr]) -> String) -> Option<Decl> {
    let TypeHead::Reference(scoped) = &te.head else { return None };
    let decl = all_decls.get(scoped)?;
    let bindings = bindings_for(decl, &te.parameters);
    Some(Decl {
        name: name_fn(&decl.name, &te.parameters),
        version: decl.version,
        body: substitute_body(&decl.body, &bindings),
        annotations: decl.annotations.clone(),
        loc: decl.loc.clone(),
    })
}

fn substitute_body(body: &DeclBody, bindings: &HashMap<String, TypeExpr>) -> DeclBody {
    match body {
        DeclBody::Struct(s) => DeclBody::Struct(StructBody {
            type_params: Vec::new(),
            fields: s.fields.iter().map(|f| substitute_field(f, bindings)).collect(),
        }),
        DeclBody::Union(u) => DeclBody::Union(UnionBody {
            type_params: Vec::new(),
            fields: u.fields.iter().map(|f| substitute_field(f, bindings)).collect(),
        }),
        DeclBody::TypeDef(t) => DeclBody::TypeDef(TypeDefBody {
            type_params: Vec::new(),
            type_expr: substitute(&t.type_expr, bindings),
        }),
        DeclBody::NewType(n) => DeclBody::NewType(NewTypeBody {
            type_params: Vec::new(),
            type_expr: substitute(&n.type_expr, bindings),
            default: n.default.clone(),
        }),
    }
}

fn substitute_field(field: &Field, bindings: &HashMap<String, TypeExpr>) -> Field {
    Field {
        name: field.name.clone(),
        type_expr: substitute(&field.type_expr, bindings),
        default: field.default.clone(),
        annotations: field.annotations.clone(),
        loc: field.loc.clone(),
    }
}

pub fn scoped_names_equal(a: &ScopedName, b: &ScopedName) -> bool {
    a == b
}

/// Canonical string rendering of a type expression, e.g. `Vector<Int32>`.
pub fn type_expr_to_string(te: &TypeExpr) -> String {
    let head = match &te.head {
        TypeHead::Unresolved { path } => path.join("."),
        TypeHead::Primitive(p) => p.to_string(),
        TypeHead::TypeParam(name) => name.clone(),
        TypeHead::Reference(scoped) => scoped.name.clone(),
    };
    if te.parameters.is_empty() {
        head
    } else {
        let params = te.parameters.iter().map(type_expr_to_string).collect::<Vec<_>>().join(",");
        format!("{head}<{params}>")
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ModuleName, Primitive, StructBody};
    use crate::nom_tools::Loc;

    use super::*;

    fn prim(p: Primitive, parameters: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr { head: TypeHead::Primitive(p), parameters, loc: Loc::synthetic() }
    }

    fn reference(decl: &Decl, module: &ModuleName, parameters: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr { head: TypeHead::Reference(ScopedName::new(module.clone(), decl.name.clone())), parameters, loc: Loc::synthetic() }
    }

    fn pair_decl(module: &ModuleName) -> Decl {
        Decl {
            name: "Pair".to_string(),
            version: None,
            body: DeclBody::Struct(StructBody {
                type_params: vec!["A".to_string(), "B".to_string()],
                fields: vec![
                    Field {
                        name: "v1".to_string(),
                        type_expr: TypeExpr { head: TypeHead::TypeParam("A".to_string()), parameters: vec![], loc: Loc::synthetic() },
                        default: None,
                        annotations: crate::ast::Annotations::new(),
                        loc: Loc::synthetic(),
                    },
                    Field {
                        name: "v2".to_string(),
                        type_expr: TypeExpr { head: TypeHead::TypeParam("B".to_string()), parameters: vec![], loc: Loc::synthetic() },
                        default: None,
                        annotations: crate::ast::Annotations::new(),
                        loc: Loc::synthetic(),
                    },
                ],
            }),
            annotations: crate::ast::Annotations::new(),
            loc: Loc::synthetic(),
        }
    }

    #[test]
    fn monomorphic_decl_substitutes_type_params() {
        let module = ModuleName::parse("demo");
        let pair = pair_decl(&module);
        let mut all_decls = OrderedMap::new();
        all_decls.insert(ScopedName::new(module.clone(), "Pair"), pair.clone());

        let te = reference(&pair, &module, vec![prim(Primitive::Int32, vec![]), prim(Primitive::Int32, vec![])]);
        let mono = monomorphic_decl(&te, &all_decls, default_mono_name).expect("monomorphic decl");

        assert_eq!(mono.name, "Pair_Int32_Int32");
        assert!(mono.body.type_params().is_empty());
        match mono.body {
            DeclBody::Struct(s) => {
                assert!(matches!(s.fields[0].type_expr.head, TypeHead::Primitive(Primitive::Int32)));
                assert!(matches!(s.fields[1].type_expr.head, TypeHead::Primitive(Primitive::Int32)));
            }
            _ => panic!("expected struct"),
        }
    }

    #[test]
    fn type_expr_to_string_renders_parameters() {
        let te = prim(Primitive::Vector, vec![prim(Primitive::Int32, vec![])]);
        assert_eq!(type_expr_to_string(&te), "Vector<Int32>");
    }
}
