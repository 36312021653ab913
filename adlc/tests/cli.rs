//! CLI-level tests: exercise `Cli::parse_from` and the translation into a
//! `DriverConfig` without spawning the `adlc` binary itself.

use std::path::PathBuf;

use clap::Parser;
use tempfile::tempdir;

#[path = "../src/cli.rs"]
mod cli;

use cli::Cli;

#[test]
fn parses_repeated_search_paths_and_sidecar_extensions() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("demo.adl");
    std::fs::write(&input, "module demo { struct Point { Int32 x; }; }").unwrap();

    let cli = Cli::parse_from([
        "adlc",
        "dump",
        input.to_str().unwrap(),
        "-I",
        "a",
        "-I",
        "b",
        "--merge-adlext",
        "adl-java",
        "--merge-adlext",
        "adl-rust",
        "--no-overwrite",
        "-vv",
    ]);

    assert_eq!(cli.search_path, vec![PathBuf::from("a"), PathBuf::from("b")]);
    assert_eq!(cli.merge_adlext, vec!["adl-java".to_string(), "adl-rust".to_string()]);
    assert!(cli.no_overwrite);
    assert_eq!(cli.log_level(), log::LevelFilter::Debug);

    let config = cli.driver_config();
    assert_eq!(config.search_path, vec![PathBuf::from("a"), PathBuf::from("b")]);
    assert_eq!(config.sidecar_exts, vec!["adl-java".to_string(), "adl-rust".to_string()]);
    assert!(config.no_overwrite);
}

#[test]
fn default_output_and_verbosity_match_unset_flags() {
    let cli = Cli::parse_from(["adlc", "dump", "demo.adl"]);
    assert_eq!(cli.output, PathBuf::from("."));
    assert_eq!(cli.log_level(), log::LevelFilter::Warn);
    assert!(cli.manifest.is_none());
}
