//! ADL Compiler Driver Executable
//!
//! Thin binary wiring the CLI surface (§6) to `adlc_core`'s pipeline:
//! parse each input, load its transitive imports, merge sidecar
//! annotations, resolve and type-check, then hand the resolved program to
//! the selected backend through the driver interface.
//!
//! The only backend implemented here is `dump`, which prints the shape of
//! every resolved decl — it demonstrates the driver interface end to end
//! but is not a real code generator (SPEC_FULL §11).

mod cli;
mod dump;

use std::process::exit;

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelPadding, TermLogger, TerminalMode, ThreadLogMode};

use adlc_core::driver::Driver;
use adlc_core::error::print_error;

use cli::{Backend, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let config = cli.driver_config();
    let (loaded, warnings) = match adlc_core::compile(&cli.inputs, &config) {
        Ok(result) => result,
        Err(error) => {
            print_error(&error);
            exit(1);
        }
    };

    for warning in &warnings {
        log::warn!("{warning}");
    }

    let driver = Driver::new(&loaded);
    match cli.backend {
        Backend::Dump => dump::run(&driver),
    }
}

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new().set_location_level(LevelFilter::Error).set_thread_mode(ThreadLogMode::Both).set_level_padding(LevelPadding::Off).set_thread_level(LevelFilter::Off).build();
    CombinedLogger::init(vec![TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)]).expect("logger already initialized");
}
