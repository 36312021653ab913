//! Annotation Merger (§4.3): overlays sidecar JSON files onto a module's
//! decls and fields after it is parsed and before it is resolved.

use std::path::{Path, PathBuf};

use crate::ast::{Annotations, Literal, Module, ScopedName};
use crate::error::AdlWarning;
use crate::file::SourceFile;
use crate::nom_tools::Loc;

/// Discovers and merges every sidecar file for `module` across the search
/// path, in search-path order (last writer wins, §4.3, §9 "Sidecar
/// precedence"). Unknown decl/field names are soft errors, accumulated as
/// warnings rather than aborting the load.
pub fn merge_sidecars(module: &mut Module, search_path: &[PathBuf], exts: &[String]) -> std::io::Result<Vec<AdlWarning>> {
    let relative = module.name.relative_path();
    let mut warnings = Vec::new();
    for dir in search_path {
        let base = dir.join(&relative);
        for ext in exts {
            let sidecar_path = base.with_extension(ext);
            if !sidecar_path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&sidecar_path)?;
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(value) => apply_sidecar(module, &sidecar_path, &value, &mut warnings),
                Err(e) => warnings.push(warning(&sidecar_path, &format!("invalid sidecar JSON: {e}"))),
            }
            log::debug!("merged sidecar {}", sidecar_path.display());
        }
    }
    Ok(warnings)
}

fn apply_sidecar(module: &mut Module, path: &Path, value: &serde_json::Value, warnings: &mut Vec<AdlWarning>) {
    let Some(top) = value.as_object() else {
        warnings.push(warning(path, "sidecar root must be a JSON object"));
        return;
    };
    for (decl_name, decl_value) in top {
        let Some(decl_obj) = decl_value.as_object() else {
            warnings.push(warning(path, &format!("sidecar entry for '{decl_name}' must be an object")));
            continue;
        };
        let Some(decl) = module.find_decl_mut(decl_name) else {
            warnings.push(warning(path, &format!("sidecar references unknown declaration '{decl_name}'")));
            continue;
        };
        if let Some(anns) = decl_obj.get("annotations").and_then(|v| v.as_object()) {
            merge_annotations(&mut decl.annotations, anns);
        }
        if let Some(fields) = decl_obj.get("fields").and_then(|v| v.as_object()) {
            for (field_name, field_value) in fields {
                let field_anns = field_value.get("annotations").and_then(|v| v.as_object());
                match decl.body.fields_mut().iter_mut().find(|f| &f.name == field_name) {
                    Some(field) => {
                        if let Some(anns) = field_anns {
                            merge_annotations(&mut field.annotations, anns);
                        }
                    }
                    None => warnings.push(warning(path, &format!("sidecar references unknown field '{decl_name}.{field_name}'"))),
                }
            }
        }
    }
}

fn merge_annotations(annotations: &mut Annotations, entries: &serde_json::Map<String, serde_json::Value>) {
    for (key, value) in entries {
        annotations.insert(ScopedName::parse(key), json_value_to_literal(value));
    }
}

fn json_value_to_literal(value: &serde_json::Value) -> Literal {
    match value {
        serde_json::Value::Null => Literal::Null,
        serde_json::Value::Bool(b) => Literal::Bool(*b),
        serde_json::Value::Number(n) => Literal::Number(n.to_string()),
        serde_json::Value::String(s) => Literal::Str(s.clone()),
        serde_json::Value::Array(items) => Literal::Array(items.iter().map(json_value_to_literal).collect()),
        serde_json::Value::Object(map) => Literal::Object(map.iter().map(|(k, v)| (k.clone(), json_value_to_literal(v))).collect()),
    }
}

fn warning(path: &Path, message: impl Into<String>) -> AdlWarning {
    let file = SourceFile::synthetic(path.display().to_string(), String::new());
    AdlWarning { message: message.into(), loc: Loc::new(file, 0..0) }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;

    use crate::ast::ModuleName;
    use crate::file::SourceFile;
    use crate::parser::parse_module;

    use super::*;

    fn parse(module_name: &str, code: &str) -> Module {
        let source = SourceFile::synthetic(module_name, code);
        parse_module(&source).expect("module parses")
    }

    #[test]
    fn merges_decl_and_field_annotations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.adl-java");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"Person": {{"annotations": {{"adlc.config.java.JavaTable": {{"tableName": "people"}}}}, "fields": {{"name": {{"annotations": {{"adlc.config.java.Column": "name_col"}}}}}}}}}}"#
        )
        .unwrap();

        let mut module = parse("demo", "module demo { struct Person { String name; }; }");
        module.name = ModuleName::parse("demo");

        let warnings = merge_sidecars(&mut module, &[dir.path().to_path_buf()], &["adl-java".to_string()]).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

        let person = module.find_decl("Person").unwrap();
        let table = person.annotations.get(&ScopedName::parse("adlc.config.java.JavaTable")).unwrap();
        assert!(matches!(table, Literal::Object(_)));

        let field = &person.body.fields()[0];
        assert_eq!(field.annotations.get(&ScopedName::parse("adlc.config.java.Column")), Some(&Literal::Str("name_col".to_string())));
    }

    #[test]
    fn unknown_decl_is_a_warning_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.adl-java");
        std::fs::write(&path, r#"{"NoSuchDecl": {"annotations": {}}}"#).unwrap();

        let mut module = parse("demo", "module demo { struct Person { String name; }; }");
        module.name = ModuleName::parse("demo");

        let warnings = merge_sidecars(&mut module, &[dir.path().to_path_buf()], &["adl-java".to_string()]).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("NoSuchDecl"));
    }

    #[test]
    fn last_writer_wins_across_search_path() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        std::fs::write(first.path().join("demo.adl-java"), r#"{"Person": {"annotations": {"sys.annotations.Doc": "first"}}}"#).unwrap();
        std::fs::write(second.path().join("demo.adl-java"), r#"{"Person": {"annotations": {"sys.annotations.Doc": "second"}}}"#).unwrap();

        let mut module = parse("demo", "module demo { struct Person { String name; }; }");
        module.name = ModuleName::parse("demo");

        let search_path = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        merge_sidecars(&mut module, &search_path, &["adl-java".to_string()]).unwrap();

        let person = module.find_decl("Person").unwrap();
        let doc = person.annotations.get(&ScopedName::parse("sys.annotations.Doc")).unwrap();
        assert_eq!(doc, &Literal::Str("second".to_string()));
    }
}
