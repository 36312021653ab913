//! Standard library modules (§6): `sys.types`, `sys.adlast`, `sys.annotations`,
//! `sys.dynamic`. Embedded as ADL source text rather than a separate
//! file-format, so they go through the same lexer/parser/resolver path as
//! user modules and are always implicitly "on the search path" (§4.2): the
//! loader consults [`lookup`] before ever touching a directory.

use crate::ast::ModuleName;

const SYS_TYPES: &str = r#"
module sys.types {
    union Maybe<T> {
        Void nothing;
        T just;
    };

    union Either<L,R> {
        L left;
        R right;
    };

    struct Pair<A,B> {
        A v1;
        B v2;
    };

    struct MapEntry<K,V> {
        K key;
        V value;
    };

    type Map<K,V> = Vector<MapEntry<K,V>>;

    type Set<T> = Vector<T>;

    union Error<T> {
        T value;
        String error;
    };
}
"#;

const SYS_ADLAST: &str = r#"
module sys.adlast {
    struct ScopedName {
        String moduleName;
        String name;
    };

    struct TypeParam {
        String name;
    };

    struct TypeRef {
        String kind;
        ScopedName ref;
    };

    struct TypeExpr {
        TypeRef typeRef;
        Vector<TypeExpr> parameters;
    };

    struct Field {
        String name;
        TypeExpr typeExpr;
        Json annotations;
    };

    struct Decl {
        String name;
        String moduleName;
        Json annotations;
    };

    struct Module {
        String name;
        Vector<Decl> decls;
    };
}
"#;

const SYS_ANNOTATIONS: &str = r#"
module sys.annotations {
    /// Attaches documentation text to a declaration or field; the sugar
    /// form for triple-slash doc comments expands to this annotation.
    newtype Doc = String;

    /// Overrides the name used when serializing a field or decl.
    newtype SerializedName = String;

    /// Marks a declaration as deprecated, with an explanatory message.
    newtype Deprecated = String;
}
"#;

const SYS_DYNAMIC: &str = r#"
module sys.dynamic {
    type Dynamic = Json;
}
"#;

/// Returns the embedded source text for a standard library module name, if
/// `name` is one of the `sys.*` modules, without touching the filesystem.
pub fn lookup(name: &ModuleName) -> Option<&'static str> {
    match name.dotted().as_str() {
        "sys.types" => Some(SYS_TYPES),
        "sys.adlast" => Some(SYS_ADLAST),
        "sys.annotations" => Some(SYS_ANNOTATIONS),
        "sys.dynamic" => Some(SYS_DYNAMIC),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::SourceFile;
    use crate::parser::parse_module;

    #[test]
    fn every_stdlib_module_parses() {
        for name in ["sys.types", "sys.adlast", "sys.annotations", "sys.dynamic"] {
            let module_name = ModuleName::parse(name);
            let text = lookup(&module_name).expect("stdlib module present");
            let source = SourceFile::synthetic(name, text);
            parse_module(&source).unwrap_or_else(|e| panic!("{name} failed to parse: {e}"));
        }
    }

    #[test]
    fn unknown_module_is_not_stdlib() {
        assert!(lookup(&ModuleName::parse("demo.app")).is_none());
    }
}
