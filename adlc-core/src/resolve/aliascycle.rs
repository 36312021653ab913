//! Type-alias cycle detection (§4.4 step 5).
//!
//! Builds a directed graph of alias-decl -> alias-decl edges taken from the
//! head of each alias's RHS, and reports any cycle as `TypeAliasCycle`.
//! Edges are restricted to declarations in the same module: a cross-module
//! alias cycle would require a mutual import between the two modules, which
//! the loader already rejects as `ImportCycle` before resolution runs.

use std::collections::HashMap;

use crate::ast::{Decl, DeclBody, ModuleName, TypeHead};
use crate::error::AdlError;
use crate::nom_tools::Loc;

pub fn check_no_alias_cycles(module_name: &ModuleName, decls: &[Decl]) -> Result<(), AdlError> {
    let mut edges: HashMap<String, (String, Loc)> = HashMap::new();
    for decl in decls {
        if let DeclBody::TypeDef(body) = &decl.body {
            if let TypeHead::Reference(target) = &body.type_expr.head {
                if &target.module == module_name {
                    edges.insert(decl.name.clone(), (target.name.clone(), decl.loc.clone()));
                }
            }
        }
    }

    for start in edges.keys() {
        let mut path = vec![start.clone()];
        let mut current = start.clone();
        while let Some((next, loc)) = edges.get(&current) {
            if next == start {
                return Err(AdlError::TypeAliasCycle { cycle: path.clone(), loc: loc.clone() });
            }
            if path.contains(next) {
                break; // a different cycle, reported when the walk starts from one of its own members
            }
            path.push(next.clone());
            current = next.clone();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::ast::{Annotations, ModuleName as MN, ScopedName, TypeDefBody, TypeExpr};
    use crate::nom_tools::Loc;

    use super::*;

    fn alias(name: &str, target: &str, module: &MN) -> Decl {
        Decl {
            name: name.to_string(),
            version: None,
            body: DeclBody::TypeDef(TypeDefBody {
                type_params: Vec::new(),
                type_expr: TypeExpr { head: TypeHead::Reference(ScopedName::new(module.clone(), target)), parameters: Vec::new(), loc: Loc::synthetic() },
            }),
            annotations: Annotations::new(),
            loc: Loc::synthetic(),
        }
    }

    #[test]
    fn detects_direct_cycle() {
        let module = MN::parse("demo");
        let decls = vec![alias("A", "B", &module), alias("B", "A", &module)];
        let err = check_no_alias_cycles(&module, &decls).unwrap_err();
        assert!(matches!(err, AdlError::TypeAliasCycle { .. }));
    }

    #[test]
    fn allows_acyclic_chain() {
        let module = MN::parse("demo");
        let decls = vec![alias("A", "B", &module), alias("B", "C", &module)];
        assert!(check_no_alias_cycles(&module, &decls).is_ok());
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let module = MN::parse("demo");
        let decls = vec![alias("A", "A", &module)];
        assert!(check_no_alias_cycles(&module, &decls).is_err());
    }
}
