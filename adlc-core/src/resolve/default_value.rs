//! Default-value conformance checking (§4.4 step 6): verifies a `Literal`
//! matches its declared `TypeExpr`, after alias expansion.

use base64::Engine;

use crate::ast::{Decl, DeclBody, Literal, Primitive, ScopedName, TypeExpr, TypeHead};
use crate::error::AdlError;
use crate::map::OrderedMap;
use crate::nom_tools::Loc;
use crate::typeutil::expand_type_alias;

/// Checks `literal` against `type_expr`, expanding type aliases first so a
/// default written against an alias is checked against its underlying
/// shape.
pub fn check_default(literal: &Literal, type_expr: &TypeExpr, all_decls: &OrderedMap<ScopedName, Decl>, path: &str, loc: &Loc) -> Result<(), AdlError> {
    let expanded = expand_type_alias(type_expr, all_decls);
    check(literal, &expanded, all_decls, path, loc)
}

fn mismatch(path: &str, expected: &str, literal: &Literal, loc: &Loc) -> AdlError {
    AdlError::DefaultValueMismatch { path: path.to_string(), expected: expected.to_string(), got: describe(literal), loc: loc.clone() }
}

fn describe(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(_) => "boolean".to_string(),
        Literal::Number(n) => format!("number({n})"),
        Literal::Str(_) => "string".to_string(),
        Literal::Array(_) => "array".to_string(),
        Literal::Object(_) => "object".to_string(),
    }
}

fn check(literal: &Literal, te: &TypeExpr, all_decls: &OrderedMap<ScopedName, Decl>, path: &str, loc: &Loc) -> Result<(), AdlError> {
    match &te.head {
        TypeHead::Primitive(p) => check_primitive(*p, literal, te, all_decls, path, loc),
        TypeHead::Reference(scoped) => check_reference(scoped, literal, all_decls, path, loc),
        TypeHead::TypeParam(_) | TypeHead::Unresolved { .. } => Ok(()),
    }
}

fn check_primitive(p: Primitive, literal: &Literal, te: &TypeExpr, all_decls: &OrderedMap<ScopedName, Decl>, path: &str, loc: &Loc) -> Result<(), AdlError> {
    match p {
        Primitive::Void => match literal {
            Literal::Null => Ok(()),
            _ => Err(mismatch(path, "Void", literal, loc)),
        },
        Primitive::Bool => match literal {
            Literal::Bool(_) => Ok(()),
            _ => Err(mismatch(path, "Bool", literal, loc)),
        },
        Primitive::Int8 | Primitive::Int16 | Primitive::Int32 | Primitive::Int64 | Primitive::Word8 | Primitive::Word16 | Primitive::Word32 | Primitive::Word64 => match literal {
            Literal::Number(_) if literal.is_integral() => Ok(()),
            _ => Err(mismatch(path, &p.to_string(), literal, loc)),
        },
        Primitive::Float | Primitive::Double => match literal {
            Literal::Number(_) => Ok(()),
            _ => Err(mismatch(path, &p.to_string(), literal, loc)),
        },
        Primitive::String => match literal {
            Literal::Str(_) => Ok(()),
            _ => Err(mismatch(path, "String", literal, loc)),
        },
        Primitive::Bytes => match literal {
            Literal::Str(s) if base64::engine::general_purpose::STANDARD.decode(s).is_ok() => Ok(()),
            _ => Err(mismatch(path, "Bytes (base64)", literal, loc)),
        },
        Primitive::Vector => match literal {
            Literal::Array(items) => {
                let elem = &te.parameters[0];
                for (i, item) in items.iter().enumerate() {
                    check(item, elem, all_decls, &format!("{path}[{i}]"), loc)?;
                }
                Ok(())
            }
            _ => Err(mismatch(path, "Vector", literal, loc)),
        },
        Primitive::StringMap => match literal {
            Literal::Object(entries) => {
                let elem = &te.parameters[0];
                for (k, v) in entries {
                    check(v, elem, all_decls, &format!("{path}.{k}"), loc)?;
                }
                Ok(())
            }
            _ => Err(mismatch(path, "StringMap", literal, loc)),
        },
        Primitive::Nullable => match literal {
            Literal::Null => Ok(()),
            other => check(other, &te.parameters[0], all_decls, path, loc),
        },
        Primitive::Json | Primitive::TypeToken => Ok(()),
    }
}

fn check_reference(scoped: &ScopedName, literal: &Literal, all_decls: &OrderedMap<ScopedName, Decl>, path: &str, loc: &Loc) -> Result<(), AdlError> {
    let Some(decl) = all_decls.get(scoped) else {
        return Err(AdlError::UnknownType { name: scoped.to_string(), loc: loc.clone() });
    };
    match &decl.body {
        DeclBody::Struct(s) => {
            let Literal::Object(entries) = literal else {
                return Err(mismatch(path, &scoped.name, literal, loc));
            };
            for key in entries.keys() {
                if !s.fields.iter().any(|f| &f.name == key) {
                    return Err(mismatch(&format!("{path}.{key}"), "a declared field", literal, loc));
                }
            }
            for field in &s.fields {
                match entries.get(&field.name) {
                    Some(value) => check(value, &field.type_expr, all_decls, &format!("{path}.{}", field.name), loc)?,
                    None if field.default.is_some() => {}
                    None => return Err(mismatch(&format!("{path}.{}", field.name), "a value or a field default", &Literal::Null, loc)),
                }
            }
            Ok(())
        }
        DeclBody::Union(u) => match literal {
            Literal::Str(tag) => {
                let field = u.fields.iter().find(|f| &f.name == tag).ok_or_else(|| mismatch(path, "a union arm name", literal, loc))?;
                match field.type_expr.head {
                    TypeHead::Primitive(Primitive::Void) => Ok(()),
                    _ => Err(mismatch(path, "a Void-typed union arm", literal, loc)),
                }
            }
            Literal::Object(entries) if entries.len() == 1 => {
                let (tag, value) = entries.iter().next().expect("len == 1");
                let field = u.fields.iter().find(|f| &f.name == tag).ok_or_else(|| mismatch(path, "a union arm name", literal, loc))?;
                check(value, &field.type_expr, all_decls, &format!("{path}.{tag}"), loc)
            }
            _ => Err(mismatch(path, "a single-key object or a union arm name", literal, loc)),
        },
        DeclBody::TypeDef(_) => unreachable!("caller expands type aliases before checking"),
        DeclBody::NewType(body) => check(literal, &body.type_expr, all_decls, path, loc),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{Annotations, Field, ModuleName, StructBody, UnionBody};
    use crate::map::OrderedMap;

    use super::*;

    fn prim(p: Primitive, parameters: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr { head: TypeHead::Primitive(p), parameters, loc: Loc::synthetic() }
    }

    fn field(name: &str, te: TypeExpr, default: Option<Literal>) -> Field {
        Field { name: name.to_string(), type_expr: te, default, annotations: Annotations::new(), loc: Loc::synthetic() }
    }

    #[test]
    fn int32_rejects_string() {
        let all_decls = OrderedMap::new();
        let err = check_default(&Literal::Str("hello".to_string()), &prim(Primitive::Int32, vec![]), &all_decls, "n", &Loc::synthetic()).unwrap_err();
        let AdlError::DefaultValueMismatch { path, expected, got, .. } = err else {
            panic!("expected DefaultValueMismatch, got {err:?}");
        };
        assert_eq!(path, "n");
        assert_eq!(expected, "Int32");
        assert_eq!(got, "string");
    }

    #[test]
    fn nullable_accepts_null_or_inner() {
        let all_decls = OrderedMap::new();
        let te = prim(Primitive::Nullable, vec![prim(Primitive::Int32, vec![])]);
        check_default(&Literal::Null, &te, &all_decls, "n", &Loc::synthetic()).unwrap();
        check_default(&Literal::Number("3".to_string()), &te, &all_decls, "n", &Loc::synthetic()).unwrap();
    }

    #[test]
    fn union_accepts_bare_string_and_single_key_object_rejects_multi_key() {
        let module = ModuleName::parse("demo");
        let u = Decl {
            name: "U".to_string(),
            version: None,
            body: DeclBody::Union(UnionBody {
                type_params: vec![],
                fields: vec![field("a", prim(Primitive::Void, vec![]), None), field("b", prim(Primitive::Int32, vec![]), None)],
            }),
            annotations: Annotations::new(),
            loc: Loc::synthetic(),
        };
        let mut all_decls = OrderedMap::new();
        let scoped = ScopedName::new(module, "U");
        all_decls.insert(scoped.clone(), u);
        let te = TypeExpr { head: TypeHead::Reference(scoped), parameters: vec![], loc: Loc::synthetic() };

        check_default(&Literal::Str("a".to_string()), &te, &all_decls, "u", &Loc::synthetic()).unwrap();

        let mut one_key = indexmap::IndexMap::new();
        one_key.insert("b".to_string(), Literal::Number("7".to_string()));
        check_default(&Literal::Object(one_key), &te, &all_decls, "u", &Loc::synthetic()).unwrap();

        let mut two_keys = indexmap::IndexMap::new();
        two_keys.insert("a".to_string(), Literal::Null);
        two_keys.insert("b".to_string(), Literal::Number("1".to_string()));
        assert!(check_default(&Literal::Object(two_keys), &te, &all_decls, "u", &Loc::synthetic()).is_err());
    }

    #[test]
    fn struct_missing_field_without_default_is_an_error() {
        let module = ModuleName::parse("demo");
        let s = Decl {
            name: "S".to_string(),
            version: None,
            body: DeclBody::Struct(StructBody { type_params: vec![], fields: vec![field("n", prim(Primitive::Int32, vec![]), None)] }),
            annotations: Annotations::new(),
            loc: Loc::synthetic(),
        };
        let mut all_decls = OrderedMap::new();
        let scoped = ScopedName::new(module, "S");
        all_decls.insert(scoped.clone(), s);
        let te = TypeExpr { head: TypeHead::Reference(scoped), parameters: vec![], loc: Loc::synthetic() };

        assert!(check_default(&Literal::Object(indexmap::IndexMap::new()), &te, &all_decls, "s", &Loc::synthetic()).is_err());
    }
}
