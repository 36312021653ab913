//! ADL (Algebraic Data Language) Compiler Core
//!
//! This is the front-end and middle-end of the ADL compiler. It provides a
//! complete pipeline from `.adl` source text to a fully resolved, type-checked
//! program that a backend code generator can walk.
//!
//! # Overview
//!
//! The compiler follows a fixed sequence of stages:
//!
//! 1. **Parsing** ([`parser`]): convert one source file into an unresolved
//!    [`ast::Module`].
//! 2. **Module loading** ([`loader`]): follow `import` statements
//!    transitively across a search path, detecting cycles, with standard
//!    library modules always available.
//! 3. **Annotation merging** ([`sidecar`]): fold sidecar JSON files into the
//!    decls and fields they target.
//! 4. **Resolution & type checking** ([`resolve`]): bind every name,
//!    check arity, reject alias cycles, validate default values.
//! 5. **Type expression utilities** ([`typeutil`]): alias/newtype expansion
//!    and monomorphisation, used by backends on demand.
//! 6. **Emission** ([`writer`], [`driver`]): backends walk the resolved
//!    program through [`driver::Driver`] and write output through
//!    [`writer::FileWriter`].
//!
//! # Usage
//!
//! ```ignore
//! use adlc_core::{compile, driver::DriverConfig};
//!
//! let config = DriverConfig {
//!     search_path: vec!["adl".into()],
//!     sidecar_exts: vec!["adl-java".into()],
//!     ..Default::default()
//! };
//! let loaded = compile(&["main.adl".into()], &config)?;
//! # Ok::<(), adlc_core::error::AdlError>(())
//! ```

pub mod ast;
pub mod driver;
pub mod error;
pub mod file;
pub mod loader;

#[rustfmt::skip]
pub mod parser;
pub mod map;
pub mod nom_tools;
pub mod resolve;
pub mod sidecar;
pub mod stdlib;
pub mod typeutil;
pub mod writer;

use std::path::PathBuf;

use driver::DriverConfig;
use error::{AdlError, AdlWarning};
use resolve::{resolve_all, LoadedAdl};

/// Runs the full pipeline — load, merge sidecars, resolve — over `roots`.
///
/// Returns the resolved program plus any sidecar warnings collected along
/// the way; the first error encountered at any stage is returned and the
/// pipeline unwinds (§7 propagation policy).
pub fn compile(roots: &[PathBuf], config: &DriverConfig) -> Result<(LoadedAdl, Vec<AdlWarning>), AdlError> {
    let (modules, warnings) = loader::load(roots, &config.search_path, &config.sidecar_exts)?;
    log::info!("loaded {} modules", modules.len());
    let loaded = resolve_all(modules)?;
    Ok((loaded, warnings))
}
