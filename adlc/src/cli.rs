//! Command-line surface (§6): translates `clap` arguments into the
//! `adlc_core::driver::DriverConfig` the core is invoked with. No
//! compiler logic lives here — only argument parsing and plumbing.

use std::path::PathBuf;

use clap::Parser;

use adlc_core::driver::DriverConfig;

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Backend {
    /// Prints the shape of every resolved decl; not a real code generator.
    Dump,
}

/// ADL compiler driver.
#[derive(Parser, Debug)]
#[command(name = "adlc", about = "Algebraic Data Language compiler driver")]
pub struct Cli {
    /// Backend to invoke.
    #[arg(value_enum)]
    pub backend: Backend,

    /// Input `.adl` files to compile.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Search path directory for resolving imports; repeatable.
    #[arg(short = 'I', value_name = "DIR")]
    pub search_path: Vec<PathBuf>,

    /// Output root directory for emitted files.
    #[arg(short = 'O', value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Sidecar file extension to merge annotations from; repeatable.
    #[arg(long = "merge-adlext", value_name = "EXT")]
    pub merge_adlext: Vec<String>,

    /// Skip rewriting a file whose contents would be unchanged.
    #[arg(long)]
    pub no_overwrite: bool,

    /// Write a `path sha256` manifest to this file after emission.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Increase logging verbosity: absent is warn, `-v` is info, `-vv` is debug.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            search_path: self.search_path.clone(),
            sidecar_exts: self.merge_adlext.clone(),
            output_root: self.output.clone(),
            no_overwrite: self.no_overwrite,
            manifest_path: self.manifest.clone(),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
