//! Integration tests for the ADL compiler core.
//!
//! These exercise the full pipeline end to end — parsing, module loading,
//! sidecar merging, and resolution together — against small fixture `.adl`
//! trees built in a temporary directory, rather than isolated fragments.

use std::path::{Path, PathBuf};

use tempfile::tempdir;

use adlc_core::ast::{DeclBody, ScopedName, TypeHead};
use adlc_core::driver::DriverConfig;
use adlc_core::error::AdlError;

fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn compiles_a_multi_module_program_with_cross_module_references() {
    let dir = tempdir().unwrap();
    write(dir.path(), "geo.adl", "module geo { struct Point { Int32 x; Int32 y; }; }");
    let app = write(
        dir.path(),
        "app.adl",
        "module app { import geo.*; struct Shape<T> { T origin; String label = \"unnamed\"; }; type Circle = Shape<geo.Point>; }",
    );

    let config = DriverConfig { search_path: vec![dir.path().to_path_buf()], ..Default::default() };
    let (loaded, warnings) = adlc_core::compile(&[app], &config).expect("compiles");
    assert!(warnings.is_empty());

    let circle = loaded.resolve(&ScopedName::new(adlc_core::ast::ModuleName::parse("app"), "Circle")).unwrap();
    let DeclBody::TypeDef(body) = &circle.body else { panic!("expected type alias") };
    match &body.type_expr.head {
        TypeHead::Reference(scoped) => assert_eq!(scoped.to_string(), "app.Shape"),
        other => panic!("expected reference, got {other:?}"),
    }
}

#[test]
fn sidecar_annotations_merge_during_full_compilation() {
    let dir = tempdir().unwrap();
    let app = write(dir.path(), "app.adl", "module app { struct Widget { String name; }; }");
    write(dir.path(), "app.adl-java", r#"{"Widget": {"annotations": {"adlc.config.java.JavaTable": {"tableName": "widgets"}}}}"#);

    let config = DriverConfig {
        search_path: vec![dir.path().to_path_buf()],
        sidecar_exts: vec!["adl-java".to_string()],
        ..Default::default()
    };
    let (loaded, warnings) = adlc_core::compile(&[app], &config).expect("compiles");
    assert!(warnings.is_empty());

    let widget = loaded.resolve(&ScopedName::new(adlc_core::ast::ModuleName::parse("app"), "Widget")).unwrap();
    assert!(widget.annotations.get(&ScopedName::parse("adlc.config.java.JavaTable")).is_some());
}

#[test]
fn import_cycle_across_two_files_is_rejected() {
    let dir = tempdir().unwrap();
    let x = write(dir.path(), "x.adl", "module x { import y.*; struct X { Void v; }; }");
    write(dir.path(), "y.adl", "module y { import x.*; struct Y { Void v; }; }");

    let config = DriverConfig { search_path: vec![dir.path().to_path_buf()], ..Default::default() };
    let err = adlc_core::compile(&[x], &config).unwrap_err();
    assert!(matches!(err, AdlError::ImportCycle { .. }));
}

#[test]
fn default_value_mismatch_surfaces_through_the_full_pipeline() {
    let dir = tempdir().unwrap();
    let app = write(dir.path(), "app.adl", r#"module app { struct Widget { Int32 count = "five"; }; }"#);

    let config = DriverConfig { search_path: vec![dir.path().to_path_buf()], ..Default::default() };
    let err = adlc_core::compile(&[app], &config).unwrap_err();
    assert!(matches!(err, AdlError::DefaultValueMismatch { .. }));
}

#[test]
fn unused_search_path_entries_do_not_prevent_stdlib_resolution() {
    let dir = tempdir().unwrap();
    let app = write(dir.path(), "app.adl", "module app { struct Box { sys.types.Maybe<String> inner; }; }");

    let config = DriverConfig { search_path: vec![dir.path().to_path_buf()], ..Default::default() };
    let (loaded, _) = adlc_core::compile(&[app], &config).expect("compiles");
    assert!(loaded.modules.iter().any(|m| m.name.dotted() == "sys.types"));
}
